// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Accounts (credentials, keyed by account ID, with an email reservation)
//! - Profiles (personalization and latest plan, keyed by email)
//! - Leaderboard entries (points, keyed by email)

use std::borrow::Cow;

use chrono::NaiveDate;
use firestore::errors::FirestoreError;
use firestore::{paths, FirestoreWritePrecondition};
use serde::{Deserialize, Serialize};

use crate::db::{collections, email_doc_id};
use crate::error::AppError;
use crate::models::{Account, ExerciseEntry, LeaderboardEntry, Profile};

/// Marker document claiming an email for one account, keyed by email.
#[derive(Debug, Serialize, Deserialize)]
struct EmailReservation {
    account_id: String,
}

/// Partial profile write carrying only the plan.
#[derive(Serialize, Deserialize)]
struct PlanUpdate<'a> {
    recommended_exercise_plan: Cow<'a, [ExerciseEntry]>,
}

/// A write lost to an existing document (`Exists(false)` precondition).
fn is_conflict(err: &FirestoreError) -> bool {
    matches!(err, FirestoreError::DataConflictError(_))
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // The emulator does not need credentials; skip the credential lookup entirely.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    /// Round-trip a minimal query to prove the database is reachable.
    pub async fn check_connection(&self) -> Result<(), AppError> {
        let _: Vec<Account> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::ACCOUNTS)
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Account Operations ──────────────────────────────────────

    /// Get an account by its ID.
    pub async fn get_account(&self, account_id: &str) -> Result<Option<Account>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::ACCOUNTS)
            .obj()
            .one(account_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the account registered with `email`, if any.
    ///
    /// Goes through the email reservation, so at most one account matches.
    pub async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        let reservation: Option<EmailReservation> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::EMAILS)
            .obj()
            .one(&email_doc_id(email))
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        match reservation {
            Some(reservation) => self.get_account(&reservation.account_id).await,
            None => Ok(None),
        }
    }

    /// Create an account and reserve its email in one transaction.
    ///
    /// Returns `false` without writing anything if the email is already
    /// reserved, including by a registration racing this one.
    pub async fn create_account(&self, account: &Account) -> Result<bool, AppError> {
        let client = self.get_client()?;
        let reservation = EmailReservation {
            account_id: account.id.clone(),
        };

        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        client
            .fluent()
            .update()
            .in_col(collections::EMAILS)
            .precondition(FirestoreWritePrecondition::Exists(false))
            .document_id(email_doc_id(&account.email))
            .object(&reservation)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add email reservation to transaction: {}", e))
            })?;

        client
            .fluent()
            .update()
            .in_col(collections::ACCOUNTS)
            .precondition(FirestoreWritePrecondition::Exists(false))
            .document_id(&account.id)
            .object(account)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add account to transaction: {}", e))
            })?;

        match transaction.commit().await {
            Ok(_) => Ok(true),
            Err(e) if is_conflict(&e) => {
                tracing::info!(email = %account.email, "Email already reserved");
                Ok(false)
            }
            Err(e) => Err(AppError::Database(format!("Transaction commit failed: {}", e))),
        }
    }

    // ─── Profile Operations ──────────────────────────────────────

    /// Get the profile for an email.
    pub async fn get_profile(&self, email: &str) -> Result<Option<Profile>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::PROFILES)
            .obj()
            .one(&email_doc_id(email))
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Write only `fields` of `profile` to the stored document.
    ///
    /// Other fields keep whatever is stored, so concurrent writers touching
    /// different fields don't clobber each other. Returns the stored profile
    /// after the write, or `None` if there is no profile for the email.
    pub async fn update_profile_fields<I>(
        &self,
        profile: &Profile,
        fields: I,
    ) -> Result<Option<Profile>, AppError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let result = self
            .get_client()?
            .fluent()
            .update()
            .fields(fields)
            .in_col(collections::PROFILES)
            .precondition(FirestoreWritePrecondition::Exists(true))
            .document_id(email_doc_id(&profile.email))
            .object(profile)
            .execute::<Profile>()
            .await;

        match result {
            Ok(stored) => Ok(Some(stored)),
            Err(FirestoreError::DataNotFoundError(_)) => Ok(None),
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }

    /// Store a new recommended plan without touching the other profile fields.
    pub async fn set_profile_plan(
        &self,
        email: &str,
        plan: &[ExerciseEntry],
    ) -> Result<Option<Profile>, AppError> {
        let result = self
            .get_client()?
            .fluent()
            .update()
            .fields(paths!(Profile::{recommended_exercise_plan}))
            .in_col(collections::PROFILES)
            .precondition(FirestoreWritePrecondition::Exists(true))
            .document_id(email_doc_id(email))
            .object(&PlanUpdate {
                recommended_exercise_plan: Cow::Borrowed(plan),
            })
            .execute::<Profile>()
            .await;

        match result {
            Ok(stored) => Ok(Some(stored)),
            Err(FirestoreError::DataNotFoundError(_)) => Ok(None),
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }

    /// Atomically create a profile and its paired leaderboard entry.
    ///
    /// Returns `false` without writing anything if a profile already exists
    /// for the email. Both writes require the documents to be absent, so a
    /// concurrent personalization loses at commit instead of overwriting.
    pub async fn create_profile_with_leaderboard(
        &self,
        profile: &Profile,
        entry: &LeaderboardEntry,
    ) -> Result<bool, AppError> {
        if self.get_profile(&profile.email).await?.is_some() {
            return Ok(false);
        }

        let client = self.get_client()?;
        let doc_id = email_doc_id(&profile.email);

        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        client
            .fluent()
            .update()
            .in_col(collections::PROFILES)
            .precondition(FirestoreWritePrecondition::Exists(false))
            .document_id(&doc_id)
            .object(profile)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add profile to transaction: {}", e))
            })?;

        client
            .fluent()
            .update()
            .in_col(collections::LEADERBOARD)
            .precondition(FirestoreWritePrecondition::Exists(false))
            .document_id(&doc_id)
            .object(entry)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!(
                    "Failed to add leaderboard entry to transaction: {}",
                    e
                ))
            })?;

        match transaction.commit().await {
            Ok(_) => {
                tracing::info!(email = %profile.email, "Profile and leaderboard entry created");
                Ok(true)
            }
            Err(e) if is_conflict(&e) => {
                tracing::info!(email = %profile.email, "Profile created concurrently");
                Ok(false)
            }
            Err(e) => Err(AppError::Database(format!("Transaction commit failed: {}", e))),
        }
    }

    // ─── Leaderboard Operations ──────────────────────────────────

    /// Get the leaderboard entry for an email.
    pub async fn get_leaderboard_entry(
        &self,
        email: &str,
    ) -> Result<Option<LeaderboardEntry>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::LEADERBOARD)
            .obj()
            .one(&email_doc_id(email))
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Overwrite a leaderboard entry.
    ///
    /// Callers do read-modify-write without a transaction, so two concurrent
    /// score updates for one account can lose an increment.
    pub async fn set_leaderboard_entry(&self, entry: &LeaderboardEntry) -> Result<(), AppError> {
        let _: LeaderboardEntry = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::LEADERBOARD)
            .document_id(email_doc_id(&entry.email))
            .object(entry)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// All leaderboard entries.
    pub async fn list_leaderboard(&self) -> Result<Vec<LeaderboardEntry>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::LEADERBOARD)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Leaderboard entries that scored on `date`.
    pub async fn list_leaderboard_updated_on(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<LeaderboardEntry>, AppError> {
        let date = date.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::LEADERBOARD)
            .filter(move |q| q.field("last_updated").eq(date.clone()))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
