// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time handling.

use chrono::{DateTime, Datelike, NaiveDate, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Current calendar date in UTC. Leaderboard day boundaries use this.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Age in whole years on `on`, for someone born on `dob`.
///
/// The age only increments on the birthday itself; a Feb 29 birthday
/// increments on Mar 1 in non-leap years.
pub fn calculate_age(dob: NaiveDate, on: NaiveDate) -> i32 {
    let mut age = on.year() - dob.year();
    if (on.month(), on.day()) < (dob.month(), dob.day()) {
        age -= 1;
    }
    age
}
