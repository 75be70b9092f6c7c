//! Accounts allowed to log in.

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub email: String,
    pub name: Option<String>,
    pub password: String,
}

impl User {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
            password: password.into(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Users keyed by email
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: HashMap<String, User>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the user with the same email
    pub fn insert(&mut self, user: User) {
        self.users.insert(user.email.clone(), user);
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// The user whose email and password both match
    pub fn verify(&self, email: &str, password: &str) -> Option<&User> {
        self.users
            .get(email)
            .filter(|user| user.password == password)
    }
}

impl FromIterator<User> for UserDirectory {
    fn from_iter<I: IntoIterator<Item = User>>(iter: I) -> Self {
        let mut directory = Self::new();
        for user in iter {
            directory.insert(user);
        }
        directory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_requires_both_fields() {
        let directory: UserDirectory = [User::new("a@b.c", "pw").with_name("Owner")]
            .into_iter()
            .collect();

        assert_eq!(directory.verify("a@b.c", "pw").map(|u| u.name.as_deref()), Some(Some("Owner")));
        assert!(directory.verify("a@b.c", "wrong").is_none());
        assert!(directory.verify("x@b.c", "pw").is_none());
    }
}
