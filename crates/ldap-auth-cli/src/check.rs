//! The credential check: bind, then the optional group search

use crate::output::{CheckReport, Printer};
use ldap_auth_core::{CredentialAttempt, GroupSearchConfig, Result};
use ldap_auth_directory::{DirectorySession, GroupQuery};
use std::io::Write;
use tracing::{debug, info};

/// Run the check and close the session afterwards, whatever the outcome.
pub async fn run_and_close<S, W>(
    session: &mut S,
    attempt: &CredentialAttempt,
    group_search: Option<&GroupSearchConfig>,
    printer: &mut Printer<W>,
) -> Result<CheckReport>
where
    S: DirectorySession,
    W: Write,
{
    let outcome = run_check(session, attempt, group_search, printer).await;
    session.close().await;
    outcome
}

/// Bind as the user and, when configured, list the groups the user belongs to.
pub async fn run_check<S, W>(
    session: &mut S,
    attempt: &CredentialAttempt,
    group_search: Option<&GroupSearchConfig>,
    printer: &mut Printer<W>,
) -> Result<CheckReport>
where
    S: DirectorySession,
    W: Write,
{
    session.bind(attempt.bind_dn(), attempt.password()).await?;
    debug!("Bound {} as {}", attempt.username(), attempt.bind_dn());
    printer.authenticated()?;

    let groups = match group_search {
        Some(config) => {
            let query = GroupQuery::for_bound_dn(config, attempt.bind_dn());
            let groups = session.search_groups(&query).await?;
            printer.groups(&groups)?;
            Some(groups)
        }
        None => {
            info!("Skipping group search due to missing configuration");
            None
        }
    };

    let report = CheckReport {
        authenticated: true,
        bind_dn: attempt.bind_dn().to_string(),
        groups,
    };
    printer.finish(&report)?;

    Ok(report)
}
