//! Credential acquisition: flags, then interactive prompt, then environment defaults

use dialoguer::{Input, Password};
use ldap_auth_core::{resolve_credential, CredentialAttempt, DirectoryConfig, Error, Result};

/// Source of interactively entered credentials
pub trait Prompter {
    /// Ask for a username, `default` is shown to the user
    fn username(&self, default: &str) -> Result<String>;

    /// Ask for a password without echo, `default` is shown masked
    fn password(&self, default: &str) -> Result<String>;
}

/// Prompts on the controlling terminal
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn username(&self, default: &str) -> Result<String> {
        let input: String = Input::new()
            .with_prompt(username_prompt(default))
            .allow_empty(true)
            .interact_text()
            .map_err(|e| Error::Prompt(format!("username: {}", e)))?;

        Ok(input.trim().to_string())
    }

    fn password(&self, default: &str) -> Result<String> {
        Password::new()
            .with_prompt(password_prompt(default))
            .allow_empty_password(true)
            .interact()
            .map_err(|e| Error::Prompt(format!("password: {}", e)))
    }
}

/// Never asks; used with `--no-prompt` or without a terminal
pub struct NoPrompt;

impl Prompter for NoPrompt {
    fn username(&self, _default: &str) -> Result<String> {
        Ok(String::new())
    }

    fn password(&self, _default: &str) -> Result<String> {
        Ok(String::new())
    }
}

/// Whether to prompt for credentials.
///
/// Prompts are written to stderr, so stdout may be redirected without
/// disabling them.
pub fn should_prompt(no_prompt: bool, stdin_tty: bool, stderr_tty: bool) -> bool {
    !no_prompt && stdin_tty && stderr_tty
}

pub fn username_prompt(default: &str) -> String {
    format!("Enter username (default: '{}')", default)
}

pub fn password_prompt(default: &str) -> String {
    format!(
        "Enter password (default: \"{}\")",
        "*".repeat(default.chars().count())
    )
}

/// Resolve username and password and build the credential attempt.
///
/// A prompt is only shown for a credential whose flag is absent or empty.
pub fn acquire_credentials(
    prompter: &dyn Prompter,
    username_flag: Option<&str>,
    password_flag: Option<&str>,
    config: &DirectoryConfig,
) -> Result<CredentialAttempt> {
    let prompted_username = match username_flag {
        Some(flag) if !flag.is_empty() => None,
        _ => Some(prompter.username(&config.default_username)?),
    };

    let prompted_password = match password_flag {
        Some(flag) if !flag.is_empty() => None,
        _ => Some(prompter.password(&config.default_password)?),
    };

    let username = resolve_credential(
        username_flag,
        prompted_username.as_deref(),
        &config.default_username,
    );
    let password = resolve_credential(
        password_flag,
        prompted_password.as_deref(),
        &config.default_password,
    );

    CredentialAttempt::new(username, password, config)
}
