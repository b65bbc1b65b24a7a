pub mod health;
pub use self::health::health;

pub mod register;
pub use self::register::register;

pub mod login;
pub use self::login::login;

pub mod jokes;
pub use self::jokes::jokes;

pub mod gate;

// common configuration and validation for the handlers
use regex::Regex;

/// Validation knobs shared by the registration and login handlers.
///
/// Minimum lengths default to 1, i.e. fields only have to be non-empty;
/// operators who want a stricter policy raise them via the CLI.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    min_username_length: usize,
    min_password_length: usize,
}

impl AuthConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_username_length: 1,
            min_password_length: 1,
        }
    }

    #[must_use]
    pub fn with_min_username_length(mut self, length: usize) -> Self {
        self.min_username_length = length;
        self
    }

    #[must_use]
    pub fn with_min_password_length(mut self, length: usize) -> Self {
        self.min_password_length = length;
        self
    }

    #[must_use]
    pub fn min_username_length(&self) -> usize {
        self.min_username_length
    }

    #[must_use]
    pub fn min_password_length(&self) -> usize {
        self.min_password_length
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A username is a single whitespace-free token of at least `min` characters.
pub fn valid_username(username: &str, min: usize) -> bool {
    username.chars().count() >= min
        && Regex::new(r"^\S+$").is_ok_and(|re| re.is_match(username))
}

/// Passwords are opaque; only a minimum length is enforced.
pub fn valid_password(password: &str, min: usize) -> bool {
    !password.is_empty() && password.chars().count() >= min
}
