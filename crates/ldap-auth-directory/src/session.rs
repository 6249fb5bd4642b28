//! LDAP session implementation
//!
//! Wraps a single `ldap3` connection. Supports LDAP, LDAPS (SSL)
//! and STARTTLS connections.

use crate::query::GroupQuery;
use crate::{RC_INVALID_CREDENTIALS, RC_UNWILLING_TO_PERFORM};
use async_trait::async_trait;
use ldap3::{
    DerefAliases, Ldap, LdapConnAsync, LdapConnSettings, Scope, SearchEntry, SearchOptions,
};
use ldap_auth_core::{ConnectionOptions, Error, Result};
use std::time::Duration;
use tracing::{debug, warn};

/// Operations performed against the directory in one invocation
#[async_trait]
pub trait DirectorySession: Send {
    /// Simple bind with `bind_dn` and `password`
    async fn bind(&mut self, bind_dn: &str, password: &str) -> Result<()>;

    /// Subtree search returning one attribute value per matching entry
    async fn search_groups(&mut self, query: &GroupQuery) -> Result<Vec<String>>;

    /// Release the connection. Never fails.
    async fn close(&mut self);
}

/// Directory session backed by `ldap3`
pub struct LdapSession {
    ldap: Ldap,
    server_url: String,
    timeout: Option<Duration>,
    closed: bool,
}

impl LdapSession {
    /// Connect to `server_url` with the given TLS and timeout settings
    pub async fn connect(server_url: &str, options: &ConnectionOptions) -> Result<Self> {
        let mut settings = LdapConnSettings::new()
            .set_starttls(options.start_tls)
            .set_no_tls_verify(options.skip_tls_verify);

        if let Some(timeout) = options.timeout {
            settings = settings.set_conn_timeout(timeout);
        }

        if options.skip_tls_verify {
            warn!("TLS certificate verification is disabled");
        }

        debug!("Connecting to LDAP server: {}", server_url);

        let (conn, ldap) = LdapConnAsync::with_settings(settings, server_url)
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        ldap3::drive!(conn);

        Ok(Self {
            ldap,
            server_url: server_url.to_string(),
            timeout: options.timeout,
            closed: false,
        })
    }

    fn apply_timeout(&mut self) {
        if let Some(timeout) = self.timeout {
            self.ldap.with_timeout(timeout);
        }
    }
}

#[async_trait]
impl DirectorySession for LdapSession {
    async fn bind(&mut self, bind_dn: &str, password: &str) -> Result<()> {
        debug!("Binding as: {}", bind_dn);

        self.apply_timeout();
        let result = self
            .ldap
            .simple_bind(bind_dn, password)
            .await
            .map_err(|e| Error::Connection(format!("bind request failed: {}", e)))?;

        bind_outcome(result.rc, &result.text)
    }

    async fn search_groups(&mut self, query: &GroupQuery) -> Result<Vec<String>> {
        debug!(
            "Searching groups under {} with filter: {}",
            query.base_dn, query.filter
        );

        self.apply_timeout();
        let (rs, _res) = self
            .ldap
            .with_search_options(
                SearchOptions::new()
                    .deref(DerefAliases::Never)
                    .sizelimit(0)
                    .timelimit(0),
            )
            .search(
                &query.base_dn,
                Scope::Subtree,
                &query.filter,
                vec![query.attribute.as_str()],
            )
            .await
            .map_err(|e| Error::SearchFailed(e.to_string()))?
            .success()
            .map_err(|e| Error::SearchFailed(e.to_string()))?;

        let groups: Vec<String> = rs
            .into_iter()
            .map(|entry| query.value_of(&SearchEntry::construct(entry)))
            .collect();

        debug!("Found {} groups for user", groups.len());
        Ok(groups)
    }

    async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        if let Err(e) = self.ldap.unbind().await {
            debug!("Unbind from {} failed: {}", self.server_url, e);
        }
    }
}

/// Map a bind result code to the outcome
fn bind_outcome(rc: u32, text: &str) -> Result<()> {
    match rc {
        0 => Ok(()),
        RC_INVALID_CREDENTIALS => Err(Error::InvalidCredentials),
        RC_UNWILLING_TO_PERFORM => Err(Error::AccountDisabled),
        rc => Err(Error::BindFailed {
            rc,
            message: if text.is_empty() {
                "no diagnostic message".to_string()
            } else {
                text.to_string()
            },
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_success() {
        assert!(bind_outcome(0, "").is_ok());
    }

    #[test]
    fn test_bind_invalid_credentials() {
        let err = bind_outcome(49, "80090308: LdapErr: DSID-0C09044E").unwrap_err();
        assert!(matches!(err, Error::InvalidCredentials));
    }

    #[test]
    fn test_bind_account_disabled() {
        assert!(matches!(
            bind_outcome(53, "account locked").unwrap_err(),
            Error::AccountDisabled
        ));
    }

    #[test]
    fn test_bind_other_code_keeps_server_text() {
        match bind_outcome(50, "insufficient access").unwrap_err() {
            Error::BindFailed { rc, message } => {
                assert_eq!(rc, 50);
                assert_eq!(message, "insufficient access");
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = bind_outcome(80, "").unwrap_err();
        assert!(err.to_string().contains("no diagnostic message"));
    }

    #[tokio::test]
    async fn test_connect_refused() {
        // Port 1 on localhost is not expected to accept LDAP connections.
        let options = ConnectionOptions {
            timeout: Some(Duration::from_secs(2)),
            ..Default::default()
        };

        match LdapSession::connect("ldap://127.0.0.1:1", &options).await {
            Err(Error::Connection(_)) => {}
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("connection to port 1 should fail"),
        }
    }
}
