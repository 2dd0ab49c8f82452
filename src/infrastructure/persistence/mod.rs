//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx. Table
//! names come from configuration, so statements are built at startup and
//! bound at run time rather than checked at compile time.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Links with conditional click/deactivation updates
//! - [`PgUserRepository`] - Registered accounts
//! - [`PgTokenRepository`] - One session row per user
//! - [`PgSecretRepository`] - Write-once key material

pub mod pg_link_repository;
pub mod pg_secret_repository;
pub mod pg_token_repository;
pub mod pg_user_repository;

pub use pg_link_repository::PgLinkRepository;
pub use pg_secret_repository::PgSecretRepository;
pub use pg_token_repository::PgTokenRepository;
pub use pg_user_repository::PgUserRepository;

use regex::Regex;
use std::sync::LazyLock;

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$").expect("valid identifier pattern")
});

/// Returns true if `name` can be interpolated into SQL as a bare table name.
pub fn is_valid_table_name(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Physical table names of the four stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNames {
    pub links: String,
    pub users: String,
    pub tokens: String,
    pub secrets: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            links: "links".to_string(),
            users: "users".to_string(),
            tokens: "session_tokens".to_string(),
            secrets: "secrets".to_string(),
        }
    }
}

impl TableNames {
    /// Returns the first name that is not a plain SQL identifier.
    pub fn first_invalid(&self) -> Option<&str> {
        [&self.links, &self.users, &self.tokens, &self.secrets]
            .into_iter()
            .map(String::as_str)
            .find(|name| !is_valid_table_name(name))
    }
}
