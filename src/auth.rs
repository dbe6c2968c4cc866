//! Account credentials.
//!
//! Only public endpoints are implemented, so credentials are carried by the
//! [`crate::client::Client`] but never attached to a request.

/// Secret string types that redact values in debug output for security.
pub use secrecy::{ExposeSecret, SecretString};

#[derive(Clone, Debug)]
pub struct Credentials {
    pub(crate) username: String,
    pub(crate) key: String,
    pub(crate) secret: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(username: String, key: String, secret: String) -> Self {
        Self {
            username,
            key,
            secret: SecretString::from(secret),
        }
    }

    /// Returns the account username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the API key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the secret.
    #[must_use]
    pub fn secret(&self) -> &SecretString {
        &self.secret
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_should_redact_secret() {
        let credentials = Credentials::new(
            "up123".to_owned(),
            "key".to_owned(),
            "very-secret".to_owned(),
        );

        let debug = format!("{credentials:?}");
        assert!(!debug.contains("very-secret"));
        assert!(debug.contains("up123"));
        assert_eq!(credentials.secret().expose_secret(), "very-secret");
    }
}
