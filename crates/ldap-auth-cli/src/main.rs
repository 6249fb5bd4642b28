//! ldap-auth - check LDAP credentials from the command line
//!
//! Binds once as the user and, when group search is configured, lists
//! the groups the user belongs to.

mod check;
mod output;
mod prompt;

use clap::{ArgAction, Parser};
use colored::Colorize;
use ldap_auth_core::{DirectoryConfig, Error, Result};
use ldap_auth_directory::LdapSession;
use output::{OutputFormat, Printer};
use prompt::{NoPrompt, Prompter, TerminalPrompter};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::OnceLock;
use tracing::{debug, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const BUILD_DATE: &str = match option_env!("LDAP_AUTH_BUILD_DATE") {
    Some(date) => date,
    None => "unknown",
};

const COMMIT: &str = match option_env!("LDAP_AUTH_COMMIT") {
    Some(commit) => commit,
    None => "none",
};

fn version() -> &'static str {
    static VERSION: OnceLock<String> = OnceLock::new();
    VERSION.get_or_init(|| {
        format!(
            "{} (built at {} from {})",
            ldap_auth_core::VERSION,
            BUILD_DATE,
            COMMIT
        )
    })
}

#[derive(Parser)]
#[command(name = "ldap-auth")]
#[command(version = version())]
#[command(about = "Authenticate against LDAP server", long_about = None)]
#[command(disable_version_flag = true)]
struct Cli {
    /// LDAP username
    #[arg(short, long)]
    username: Option<String>,

    /// LDAP password
    #[arg(short, long)]
    password: Option<String>,

    /// Read environment variables from this file in addition to ./.env
    #[arg(long, value_name = "PATH")]
    env_file: Option<PathBuf>,

    /// Never prompt, fall back to LDAP_USERNAME / LDAP_PASSWORD
    #[arg(long)]
    no_prompt: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LDAP_AUTH_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Print version
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: Option<bool>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            if e.is_auth_failure() {
                warn!(
                    "Check the username, the password and the {} template",
                    ldap_auth_core::env::USER_DN
                );
            }
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    if let Some(path) = &cli.env_file {
        dotenvy::from_path(path).map_err(|e| {
            Error::InvalidConfig(format!("failed to load {}: {}", path.display(), e))
        })?;
    }

    let config = DirectoryConfig::from_env()?;
    debug!("Loaded configuration: {:?}", config);
    // The user filter is required but no lookup uses it yet.
    debug!("User filter: {}", config.user_filter);

    let interactive = prompt::should_prompt(
        cli.no_prompt,
        std::io::stdin().is_terminal(),
        std::io::stderr().is_terminal(),
    );
    let prompter: Box<dyn Prompter> = if interactive {
        Box::new(TerminalPrompter)
    } else {
        Box::new(NoPrompt)
    };

    let attempt = prompt::acquire_credentials(
        prompter.as_ref(),
        cli.username.as_deref(),
        cli.password.as_deref(),
        &config,
    )?;
    debug!("Credential attempt: {:?}", attempt);

    let mut session = LdapSession::connect(&config.server_url, &config.connection).await?;
    let mut printer = Printer::new(cli.output, std::io::stdout());

    check::run_and_close(
        &mut session,
        &attempt,
        config.group_search.as_ref(),
        &mut printer,
    )
    .await?;

    Ok(())
}
