//! Error types for ldap-auth

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // Configuration Errors
    #[error("Missing LDAP configuration: {}", .0.join(", "))]
    MissingConfig(Vec<&'static str>),

    #[error("Invalid LDAP configuration: {0}")]
    InvalidConfig(String),

    // Credential Errors
    #[error("Username and password are required")]
    MissingCredentials,

    #[error("Failed to read {0}")]
    Prompt(String),

    // Directory Errors
    #[error("Failed to connect to LDAP server: {0}")]
    Connection(String),

    #[error("Authentication failed: invalid credentials")]
    InvalidCredentials,

    #[error("Authentication failed: account disabled or locked")]
    AccountDisabled,

    #[error("Authentication failed: result code {rc}: {message}")]
    BindFailed { rc: u32, message: String },

    #[error("Failed to search groups: {0}")]
    SearchFailed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::MissingConfig(_) | Error::InvalidConfig(_) => 2,

            Error::MissingCredentials | Error::Prompt(_) => 3,

            Error::Connection(_) => 4,

            Error::InvalidCredentials | Error::AccountDisabled | Error::BindFailed { .. } => 5,

            Error::SearchFailed(_) => 6,

            Error::Io(_) => 1,
        }
    }

    /// Whether the directory rejected the credentials
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Error::InvalidCredentials | Error::AccountDisabled | Error::BindFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_lists_variables() {
        let err = Error::MissingConfig(vec!["LDAP_URL", "LDAP_USER_FILTER"]);
        assert_eq!(
            err.to_string(),
            "Missing LDAP configuration: LDAP_URL, LDAP_USER_FILTER"
        );
    }

    #[test]
    fn test_exit_codes_are_nonzero() {
        let errors = [
            Error::MissingConfig(vec!["LDAP_URL"]),
            Error::MissingCredentials,
            Error::Connection("refused".into()),
            Error::InvalidCredentials,
            Error::SearchFailed("no such object".into()),
            Error::Io(std::io::Error::other("broken pipe")),
        ];

        for err in &errors {
            assert_ne!(err.exit_code(), 0, "{err}");
        }
        assert_eq!(Error::InvalidConfig("x".into()).exit_code(), 2);
        assert_eq!(Error::AccountDisabled.exit_code(), 5);
    }

    #[test]
    fn test_auth_failure_classification() {
        assert!(Error::InvalidCredentials.is_auth_failure());
        assert!(Error::BindFailed {
            rc: 50,
            message: "insufficient access".into()
        }
        .is_auth_failure());
        assert!(!Error::Connection("timeout".into()).is_auth_failure());
    }
}
