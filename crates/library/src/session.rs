//! Locally stored user record
//!
//! There is no account server; signing in just writes a profile under the
//! user key and signing out deletes it.

use crate::error::{LibraryError, LibraryResult};
use bookfinder_core::Timestamp;
use bookfinder_storage::{keys, PersistentStore};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl UserProfile {
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
        }
    }

    /// Builds a profile for a fresh sign-in
    ///
    /// The id is the sign-in time in milliseconds. Without a name, the part of
    /// the email before `@` is used.
    pub fn for_sign_in(email: &str, name: Option<&str>, at: Timestamp) -> LibraryResult<Self> {
        let email = email.trim();
        if !email.contains('@') {
            return Err(LibraryError::InvalidProfile(format!(
                "'{}' is not an email address",
                email
            )));
        }

        let name = match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => name.to_string(),
            None => email.split('@').next().unwrap_or_default().to_string(),
        };

        Ok(Self::new(at.as_millis().to_string(), name, email))
    }
}

pub struct SessionStore {
    store: PersistentStore,
}

impl SessionStore {
    pub fn new(store: PersistentStore) -> Self {
        Self { store }
    }

    /// The signed-in user, if any
    pub fn load(&self) -> LibraryResult<Option<UserProfile>> {
        Ok(self.store.get(keys::USER)?)
    }

    pub fn store(&self, profile: &UserProfile) -> LibraryResult<()> {
        self.store.set(keys::USER, profile)?;
        log::info!("Signed in as {}", profile.email);
        Ok(())
    }

    /// Changes name and email of the signed-in user
    pub fn update(&self, name: &str, email: &str) -> LibraryResult<UserProfile> {
        let mut profile = self.load()?.ok_or(LibraryError::NotSignedIn)?;
        profile.name = name.trim().to_string();
        profile.email = email.trim().to_string();
        self.store.set(keys::USER, &profile)?;
        Ok(profile)
    }

    pub fn clear(&self) -> LibraryResult<()> {
        self.store.remove(keys::USER)?;
        log::info!("Signed out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_name_defaults_to_email_local_part() {
        let profile =
            UserProfile::for_sign_in("reader@example.org", None, Timestamp::from_millis(42))
                .unwrap();
        assert_eq!(profile.name, "reader");
        assert_eq!(profile.id, "42");
    }

    #[test]
    fn test_sign_in_rejects_non_email() {
        assert!(UserProfile::for_sign_in("reader", None, Timestamp::now()).is_err());
    }

    #[test]
    fn test_store_load_clear() {
        let sessions = SessionStore::new(PersistentStore::in_memory());
        assert!(sessions.load().unwrap().is_none());

        let profile = UserProfile::new("1", "Ada", "ada@example.org");
        sessions.store(&profile).unwrap();
        assert_eq!(sessions.load().unwrap(), Some(profile));

        sessions.clear().unwrap();
        assert!(sessions.load().unwrap().is_none());
    }

    #[test]
    fn test_update_requires_sign_in() {
        let sessions = SessionStore::new(PersistentStore::in_memory());
        assert!(matches!(
            sessions.update("Ada", "ada@example.org"),
            Err(LibraryError::NotSignedIn)
        ));
    }

    #[test]
    fn test_update_keeps_id() {
        let sessions = SessionStore::new(PersistentStore::in_memory());
        sessions
            .store(&UserProfile::new("7", "Ada", "ada@example.org"))
            .unwrap();

        let updated = sessions.update(" Ada L. ", "ada@lovelace.org").unwrap();
        assert_eq!(updated.id, "7");
        assert_eq!(updated.name, "Ada L.");
    }
}
