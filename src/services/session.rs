use crate::db::KeyValueStorage;

pub const SESSION_KEY: &str = "bdtLoggedIn";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Lösenorden matchar inte.")]
    PasswordMismatch,
}

/// A storage error reads as logged out.
pub fn is_logged_in(storage: &dyn KeyValueStorage) -> bool {
    matches!(storage.get(SESSION_KEY), Ok(Some(flag)) if flag == "1")
}

/// Returns whether the flag was written.
pub fn set_logged_in(storage: &mut dyn KeyValueStorage, logged_in: bool) -> bool {
    let result = if logged_in {
        storage.set(SESSION_KEY, "1")
    } else {
        storage.remove(SESSION_KEY)
    };
    match result {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "could not store session flag");
            false
        }
    }
}

/// There is no account backend: any credentials are accepted.
pub fn log_in(storage: &mut dyn KeyValueStorage) -> bool {
    let stored = set_logged_in(storage, true);
    if stored {
        tracing::info!("logged in");
    }
    stored
}

pub fn log_out(storage: &mut dyn KeyValueStorage) -> bool {
    let stored = set_logged_in(storage, false);
    if stored {
        tracing::info!("logged out");
    }
    stored
}

pub fn register(
    storage: &mut dyn KeyValueStorage,
    password: &str,
    confirm: &str,
) -> Result<(), SessionError> {
    if password != confirm {
        return Err(SessionError::PasswordMismatch);
    }
    log_in(storage);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryStorage, StorageError};

    struct BrokenStorage;

    impl KeyValueStorage for BrokenStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("blocked".to_string()))
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("blocked".to_string()))
        }
        fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("blocked".to_string()))
        }
    }

    #[test]
    fn test_log_in_and_out() {
        let mut storage = MemoryStorage::default();
        assert!(!is_logged_in(&storage));

        assert!(log_in(&mut storage));
        assert!(is_logged_in(&storage));
        assert_eq!(storage.get(SESSION_KEY).unwrap().as_deref(), Some("1"));

        assert!(log_out(&mut storage));
        assert!(!is_logged_in(&storage));
        assert_eq!(storage.get(SESSION_KEY).unwrap(), None);
    }

    #[test]
    fn test_other_flag_values_are_logged_out() {
        let mut storage = MemoryStorage::default();
        storage.set(SESSION_KEY, "true").unwrap();
        assert!(!is_logged_in(&storage));
    }

    #[test]
    fn test_register_requires_matching_passwords() {
        let mut storage = MemoryStorage::default();
        let err = register(&mut storage, "hemligt", "Hemligt").unwrap_err();
        assert_eq!(err.to_string(), "Lösenorden matchar inte.");
        assert!(!is_logged_in(&storage));

        register(&mut storage, "hemligt", "hemligt").unwrap();
        assert!(is_logged_in(&storage));
    }

    #[test]
    fn test_broken_storage_reads_as_logged_out() {
        let mut storage = BrokenStorage;
        assert!(!log_in(&mut storage));
        assert!(!is_logged_in(&storage));
        assert!(!log_out(&mut storage));
    }
}
