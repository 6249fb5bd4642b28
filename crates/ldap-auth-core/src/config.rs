//! Directory configuration loaded from the environment
//!
//! Required:
//! - `LDAP_URL` (ldap://, ldaps:// or ldapi://)
//! - `LDAP_USER_DN`, the bind DN template, e.g. `uid=%s,ou=people,dc=example,dc=com`
//! - `LDAP_USER_FILTER`
//!
//! Optional:
//! - `LDAP_GROUP_DN`, `LDAP_GROUP_FILTER`, `LDAP_GROUP_ATTRIBUTE` (all three or no group search)
//! - `LDAP_USERNAME`, `LDAP_PASSWORD` (credential defaults)
//! - `LDAP_TIMEOUT`, `LDAP_STARTTLS`, `LDAP_SKIP_TLS_VERIFY`

use crate::env;
use crate::template::{format_template, has_placeholder};
use crate::{Error, Result};
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// LDAP directory configuration
#[derive(Clone)]
pub struct DirectoryConfig {
    /// LDAP server URL
    /// Example: "ldap://ldap.example.com:389" or "ldaps://ldap.example.com:636"
    pub server_url: String,

    /// Bind DN template, `%s` is replaced with the username
    /// Example: "uid=%s,ou=people,dc=example,dc=com"
    pub user_dn_template: String,

    /// User search filter
    /// Example: "(uid=%s)"
    pub user_filter: String,

    /// Group search, `None` when not fully configured
    pub group_search: Option<GroupSearchConfig>,

    /// Username used when neither flag nor prompt supplies one
    pub default_username: String,

    /// Password used when neither flag nor prompt supplies one
    pub default_password: String,

    /// Connection settings
    pub connection: ConnectionOptions,
}

/// Group membership search parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSearchConfig {
    /// Base DN for the subtree search
    /// Example: "ou=groups,dc=example,dc=com"
    pub base_dn: String,

    /// Filter template, `%s` is replaced with the bound user DN
    /// Example: "(member=%s)"
    pub filter_template: String,

    /// Attribute printed for each matching group
    /// Example: "cn"
    pub attribute: String,
}

/// Connection settings passed to the directory client
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionOptions {
    /// Connect timeout, network stack default when unset
    pub timeout: Option<Duration>,

    /// Upgrade a plain ldap:// connection with STARTTLS
    pub start_tls: bool,

    /// Skip TLS certificate verification (not recommended for production)
    pub skip_tls_verify: bool,
}

impl DirectoryConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let server_url = get(env::URL);
        let user_dn_template = get(env::USER_DN);
        let user_filter = get(env::USER_FILTER);

        let (server_url, user_dn_template, user_filter) =
            match (server_url, user_dn_template, user_filter) {
                (Some(url), Some(dn), Some(filter)) => (url, dn, filter),
                (url, dn, filter) => {
                    let mut missing = Vec::new();
                    if url.is_none() {
                        missing.push(env::URL);
                    }
                    if dn.is_none() {
                        missing.push(env::USER_DN);
                    }
                    if filter.is_none() {
                        missing.push(env::USER_FILTER);
                    }
                    return Err(Error::MissingConfig(missing));
                }
            };

        let group_search = match (
            get(env::GROUP_DN),
            get(env::GROUP_FILTER),
            get(env::GROUP_ATTRIBUTE),
        ) {
            (Some(base_dn), Some(filter_template), Some(attribute)) => Some(GroupSearchConfig {
                base_dn,
                filter_template,
                attribute,
            }),
            (None, None, None) => None,
            _ => {
                debug!("Group search is partially configured and will be skipped");
                None
            }
        };

        let connection = ConnectionOptions {
            timeout: get(env::TIMEOUT).map(|v| parse_timeout(&v)).transpose()?,
            start_tls: get(env::STARTTLS)
                .map(|v| parse_bool(env::STARTTLS, &v))
                .transpose()?
                .unwrap_or(false),
            skip_tls_verify: get(env::SKIP_TLS_VERIFY)
                .map(|v| parse_bool(env::SKIP_TLS_VERIFY, &v))
                .transpose()?
                .unwrap_or(false),
        };

        let config = Self {
            server_url,
            user_dn_template,
            user_filter,
            group_search,
            default_username: get(env::USERNAME).unwrap_or_default(),
            default_password: get(env::PASSWORD).unwrap_or_default(),
            connection,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.server_url)
            .map_err(|e| Error::InvalidConfig(format!("{}: {}", env::URL, e)))?;

        match url.scheme() {
            "ldap" | "ldapi" => {}
            "ldaps" if self.connection.start_tls => {
                return Err(Error::InvalidConfig(format!(
                    "{} cannot be used with an ldaps:// URL",
                    env::STARTTLS
                )));
            }
            "ldaps" => {}
            other => {
                return Err(Error::InvalidConfig(format!(
                    "{} must use ldap://, ldaps:// or ldapi://, got {}://",
                    env::URL,
                    other
                )));
            }
        }

        if !has_placeholder(&self.user_dn_template) {
            warn!(
                "{} has no %s placeholder, every username binds as the same DN",
                env::USER_DN
            );
        }

        Ok(())
    }

    /// Build the bind DN for `username`
    pub fn bind_dn_for(&self, username: &str) -> String {
        format_template(&self.user_dn_template, username)
    }
}

impl fmt::Debug for DirectoryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectoryConfig")
            .field("server_url", &self.server_url)
            .field("user_dn_template", &self.user_dn_template)
            .field("user_filter", &self.user_filter)
            .field("group_search", &self.group_search)
            .field("default_username", &self.default_username)
            .field("default_password", &"***")
            .field("connection", &self.connection)
            .finish()
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::InvalidConfig(format!(
            "{} must be a boolean, got {:?}",
            key, value
        ))),
    }
}

fn parse_timeout(value: &str) -> Result<Duration> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(Error::InvalidConfig(format!(
            "{} must be a positive number of seconds, got {:?}",
            env::TIMEOUT,
            value
        ))),
    }
}
