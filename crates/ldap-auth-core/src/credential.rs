//! The credential attempt made by a single invocation

use crate::config::DirectoryConfig;
use crate::{Error, Result};
use std::fmt;

/// Pick the first non-empty value of flag, prompt answer and environment default.
pub fn resolve_credential(flag: Option<&str>, prompted: Option<&str>, env_default: &str) -> String {
    flag.filter(|v| !v.is_empty())
        .or_else(|| prompted.filter(|v| !v.is_empty()))
        .unwrap_or(env_default)
        .to_string()
}

/// Username, password and the bind DN built from them
#[derive(Clone)]
pub struct CredentialAttempt {
    username: String,
    password: String,
    bind_dn: String,
}

impl CredentialAttempt {
    /// Build the attempt, formatting the bind DN from the configured template.
    pub fn new(username: String, password: String, config: &DirectoryConfig) -> Result<Self> {
        if username.is_empty() || password.is_empty() {
            return Err(Error::MissingCredentials);
        }

        let bind_dn = config.bind_dn_for(&username);
        Ok(Self {
            username,
            password,
            bind_dn,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn bind_dn(&self) -> &str {
        &self.bind_dn
    }
}

impl fmt::Debug for CredentialAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialAttempt")
            .field("username", &self.username)
            .field("password", &"***")
            .field("bind_dn", &self.bind_dn)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConnectionOptions;

    fn config(template: &str) -> DirectoryConfig {
        DirectoryConfig {
            server_url: "ldap://localhost:389".to_string(),
            user_dn_template: template.to_string(),
            user_filter: "(uid=%s)".to_string(),
            group_search: None,
            default_username: String::new(),
            default_password: String::new(),
            connection: ConnectionOptions::default(),
        }
    }

    #[test]
    fn test_flag_overrides_env_default() {
        assert_eq!(resolve_credential(Some("bob"), None, "alice"), "bob");
        assert_eq!(resolve_credential(Some("bob"), Some("carol"), "alice"), "bob");
    }

    #[test]
    fn test_empty_flag_falls_back() {
        assert_eq!(resolve_credential(Some(""), None, "alice"), "alice");
        assert_eq!(resolve_credential(Some(""), Some("carol"), "alice"), "carol");
        assert_eq!(resolve_credential(None, Some(""), "alice"), "alice");
        assert_eq!(resolve_credential(None, None, ""), "");
    }

    #[test]
    fn test_attempt_formats_bind_dn() {
        let attempt = CredentialAttempt::new(
            "alice".to_string(),
            "secret".to_string(),
            &config("uid=%s,dc=example"),
        )
        .unwrap();

        assert_eq!(attempt.username(), "alice");
        assert_eq!(attempt.password(), "secret");
        assert_eq!(attempt.bind_dn(), "uid=alice,dc=example");
    }

    #[test]
    fn test_attempt_requires_both_credentials() {
        let config = config("uid=%s,dc=example");

        let err = CredentialAttempt::new(String::new(), "secret".to_string(), &config).unwrap_err();
        assert!(matches!(err, Error::MissingCredentials));

        let err = CredentialAttempt::new("alice".to_string(), String::new(), &config).unwrap_err();
        assert!(matches!(err, Error::MissingCredentials));
    }

    #[test]
    fn test_debug_hides_password() {
        let attempt = CredentialAttempt::new(
            "alice".to_string(),
            "hunter2".to_string(),
            &config("uid=%s,dc=example"),
        )
        .unwrap();

        let debug = format!("{:?}", attempt);
        assert!(debug.contains("uid=alice,dc=example"));
        assert!(!debug.contains("hunter2"));
    }
}
