// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod mail;
pub mod password;
pub mod recommendation;

pub use mail::{LogNotifier, Notifier};
pub use recommendation::RecommendationClient;
