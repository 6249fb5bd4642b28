//! ldap-auth Core Library
//!
//! Configuration, errors and the credential attempt shared by the
//! directory client and the command-line front end.

pub mod config;
pub mod credential;
pub mod error;
pub mod template;

pub use config::{ConnectionOptions, DirectoryConfig, GroupSearchConfig};
pub use credential::{resolve_credential, CredentialAttempt};
pub use error::{Error, Result};
pub use template::format_template;

/// ldap-auth version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable names
pub mod env {
    pub const URL: &str = "LDAP_URL";
    pub const USER_DN: &str = "LDAP_USER_DN";
    pub const USER_FILTER: &str = "LDAP_USER_FILTER";
    pub const GROUP_DN: &str = "LDAP_GROUP_DN";
    pub const GROUP_FILTER: &str = "LDAP_GROUP_FILTER";
    pub const GROUP_ATTRIBUTE: &str = "LDAP_GROUP_ATTRIBUTE";
    pub const USERNAME: &str = "LDAP_USERNAME";
    pub const PASSWORD: &str = "LDAP_PASSWORD";
    pub const TIMEOUT: &str = "LDAP_TIMEOUT";
    pub const STARTTLS: &str = "LDAP_STARTTLS";
    pub const SKIP_TLS_VERIFY: &str = "LDAP_SKIP_TLS_VERIFY";
}
