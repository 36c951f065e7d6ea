//! Secure credential container with automatic memory zeroing.
//!
//! # Security
//! - Username and password live in `Zeroizing<String>` containers
//! - Memory is cleared when the credentials go out of scope
//! - The password is never exposed through `Debug` output

use zeroize::Zeroizing;

/// Database user and password, zeroed on drop.
///
/// # Example
///
/// ```rust
/// use source_firebird_core::security::Credentials;
///
/// let creds = Credentials::new("SYSDBA".to_string(), "masterkey".to_string());
/// assert_eq!(creds.username(), "SYSDBA");
/// assert!(creds.has_password());
/// assert!(!format!("{creds:?}").contains("masterkey"));
/// ```
#[derive(Clone)]
pub struct Credentials {
    username: Zeroizing<String>,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Takes ownership of the username and password.
    pub fn new(username: String, password: String) -> Self {
        Self {
            username: Zeroizing::new(username),
            password: Zeroizing::new(password),
        }
    }

    /// Gets the username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Gets the password for handing to the driver.
    ///
    /// Callers must not log or store the returned value.
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Checks if a non-empty password is present without exposing it.
    pub fn has_password(&self) -> bool {
        !self.password.is_empty()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username.as_str())
            .field("password", &"****")
            .finish()
    }
}
