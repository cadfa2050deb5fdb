use std::collections::HashMap;
use std::sync::RwLock;

/// Registered user. Created at registration, never updated or deleted.
#[derive(Debug, Clone)]
pub struct User {
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("username already registered")]
    DuplicateUser,
}

/// Minimal credential-store seam so a persistent backend could be swapped in
/// without touching the handlers.
pub trait UserStore: Send + Sync {
    fn insert(&self, user: User) -> Result<(), StoreError>;
    fn get(&self, username: &str) -> Option<User>;
    fn contains(&self, username: &str) -> bool;
}

/// Process-lifetime user table. Usernames match case-sensitively.
#[derive(Default)]
pub struct MemoryUserStore {
    inner: RwLock<HashMap<String, User>>,
}

impl UserStore for MemoryUserStore {
    fn insert(&self, user: User) -> Result<(), StoreError> {
        // Check-then-insert happens under a single write lock so two
        // concurrent registrations of the same username cannot both succeed.
        let mut map = self.inner.write().expect("user store lock poisoned");
        if map.contains_key(&user.username) {
            return Err(StoreError::DuplicateUser);
        }
        map.insert(user.username.clone(), user);
        Ok(())
    }

    fn get(&self, username: &str) -> Option<User> {
        self.inner
            .read()
            .expect("user store lock poisoned")
            .get(username)
            .cloned()
    }

    fn contains(&self, username: &str) -> bool {
        self.inner
            .read()
            .expect("user store lock poisoned")
            .contains_key(username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn user(username: &str) -> User {
        User {
            username: username.into(),
            password_hash: "$argon2id$stub".into(),
        }
    }

    #[test]
    fn insert_then_get_roundtrips() {
        let store = MemoryUserStore::default();
        store.insert(user("gardener")).unwrap();

        assert!(store.contains("gardener"));
        assert_eq!(store.get("gardener").unwrap().username, "gardener");
        assert!(store.get("botanist").is_none());
    }

    #[test]
    fn second_insert_of_same_username_fails() {
        let store = MemoryUserStore::default();
        assert!(store.insert(user("gardener")).is_ok());
        assert_eq!(
            store.insert(user("gardener")),
            Err(StoreError::DuplicateUser)
        );
    }

    #[test]
    fn usernames_are_case_sensitive() {
        let store = MemoryUserStore::default();
        store.insert(user("Gardener")).unwrap();

        assert!(!store.contains("gardener"));
        assert!(store.insert(user("gardener")).is_ok());
    }

    #[test]
    fn concurrent_registration_admits_exactly_one_winner() {
        let store = Arc::new(MemoryUserStore::default());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    store
                        .insert(User {
                            username: "gardener".into(),
                            password_hash: format!("hash-{i}"),
                        })
                        .is_ok()
                })
            })
            .collect();

        let wins = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(wins, 1);
    }
}
