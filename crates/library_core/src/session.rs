use anyhow::{bail, Context, Result};
use chrono::Utc;
use shared::{
    domain::{ReadingStats, UserProfile},
    protocol::{ProfilePatch, CURRENT_USER_KEY},
};
use storage::KeyValueStore;
use tracing::{info, warn};

use crate::Route;

/// Demo statistics written into every freshly created profile.
pub fn placeholder_stats(favorite_category: impl Into<String>) -> ReadingStats {
    ReadingStats {
        books_read: 12,
        current_books: 3,
        reading_hours: 45,
        favorite_category: favorite_category.into(),
    }
}

/// Reads and writes the single persisted [`UserProfile`]. Its presence in the
/// store is what "logged in" means.
pub struct SessionStore<S> {
    store: S,
    seed_stats: ReadingStats,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(store: S, seed_stats: ReadingStats) -> Self {
        Self { store, seed_stats }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Absent when nothing is stored or the stored value does not decode.
    pub fn get_current_user(&self) -> Result<Option<UserProfile>> {
        let Some(raw) = self
            .store
            .get_string(CURRENT_USER_KEY)
            .context("failed to read persisted session")?
        else {
            return Ok(None);
        };

        match serde_json::from_str::<UserProfile>(&raw) {
            Ok(profile) => Ok(Some(profile)),
            Err(err) => {
                warn!(error = %err, "persisted session is malformed; treating as logged out");
                Ok(None)
            }
        }
    }

    pub fn save_user(&self, profile: &UserProfile) -> Result<()> {
        let serialized = serde_json::to_string(profile).context("failed to encode session")?;
        self.store
            .set_string(CURRENT_USER_KEY, serialized)
            .context("failed to persist session")
    }

    /// Creates a fresh profile for `username`, replacing any stored session.
    /// Any non-empty username is taken verbatim; the password is accepted and
    /// ignored.
    pub fn login(&self, username: &str, _password: &str) -> Result<UserProfile> {
        if username.is_empty() {
            bail!("username must not be empty");
        }

        let profile = UserProfile {
            username: username.to_string(),
            name: username.to_string(),
            email: format!("{username}@example.com"),
            phone: String::new(),
            birth_date: String::new(),
            bio: String::new(),
            interests: String::new(),
            avatar: None,
            join_date: Utc::now(),
            stats: self.seed_stats.clone(),
        };
        self.save_user(&profile)?;
        info!(username, "session created");
        Ok(profile)
    }

    /// Drops the session; the caller navigates to the returned route.
    pub fn logout(&self) -> Result<Route> {
        self.store
            .remove(CURRENT_USER_KEY)
            .context("failed to remove persisted session")?;
        info!("session removed");
        Ok(Route::Login)
    }

    pub fn is_logged_in(&self) -> Result<bool> {
        Ok(self.get_current_user()?.is_some())
    }

    /// Shallow-merges `patch` onto the stored profile. No-op returning
    /// `None` without a session.
    pub fn update_profile(&self, patch: ProfilePatch) -> Result<Option<UserProfile>> {
        let Some(current) = self.get_current_user()? else {
            return Ok(None);
        };
        let updated = patch.apply_to(current);
        self.save_user(&updated)?;
        Ok(Some(updated))
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
