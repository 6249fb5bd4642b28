//! Directory access for ldap-auth
//!
//! One connection per invocation:
//! - simple bind as the user
//! - optional subtree search for group memberships
//! - unbind on every exit path

mod query;
mod session;

pub use query::GroupQuery;
pub use session::{DirectorySession, LdapSession};

/// LDAP result code for invalidCredentials
pub const RC_INVALID_CREDENTIALS: u32 = 49;

/// LDAP result code for unwillingToPerform (disabled or locked accounts)
pub const RC_UNWILLING_TO_PERFORM: u32 = 53;
