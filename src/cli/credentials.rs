//! Contact email required by NCBI with every request.
//!
//! Looked up in the configuration first, then in a sidecar file. When neither
//! has one and stdin is a terminal, the user is asked for it once and the
//! answer is saved to the sidecar.

use crate::cli::formatter::{print_success, print_warning};
use crate::core::config::Config;
use crate::core::paths;
use crate::{Result, SpotCheckError};
use dialoguer::{theme::ColorfulTheme, Input};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Sidecar location honouring `contact.email_file`
pub fn email_path(config: &Config) -> PathBuf {
    config
        .contact
        .email_file
        .as_deref()
        .map(str::trim)
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(paths::default_email_path)
}

pub fn is_interactive() -> bool {
    atty::is(atty::Stream::Stdin)
}

/// Trim and check an address; it only has to contain '@'
pub fn validate_email(candidate: &str) -> Result<String> {
    let email = candidate.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(SpotCheckError::Config(format!(
            "'{}' is not an email address",
            email
        )));
    }
    Ok(email.to_string())
}

/// Stored address, or `None` when the sidecar is missing or blank
pub fn read_email(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path)?;
    let email = contents.trim();
    Ok((!email.is_empty()).then(|| email.to_string()))
}

pub fn store_email(path: &Path, email: &str) -> Result<()> {
    let email = validate_email(email)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, format!("{}\n", email))?;
    debug!("Stored contact email in {}", path.display());
    Ok(())
}

/// Find the contact email, prompting for it when allowed
pub fn resolve_email(config: &Config, interactive: bool) -> Result<String> {
    if let Some(email) = config
        .contact
        .email
        .as_deref()
        .filter(|email| !email.trim().is_empty())
    {
        return validate_email(email);
    }

    let path = email_path(config);
    if let Some(email) = read_email(&path)? {
        debug!("Using contact email from {}", path.display());
        return validate_email(&email);
    }

    if !interactive {
        return Err(SpotCheckError::Config(format!(
            "no contact email configured; run `spotcheck email set <address>` or add contact.email to the config (looked in {})",
            path.display()
        )));
    }

    let email = prompt_email()?;
    store_email(&path, &email)?;
    print_success(&format!("Saved contact email to {}", path.display()));
    Ok(email)
}

/// Ask twice until both entries match
fn prompt_email() -> Result<String> {
    let theme = ColorfulTheme::default();
    loop {
        let first = ask(&theme, "NCBI requires a contact email address")?;
        let second = ask(&theme, "Enter it again to confirm")?;
        if first == second {
            return validate_email(&first);
        }
        print_warning("The two entries do not match");
    }
}

fn ask(theme: &ColorfulTheme, prompt: &str) -> Result<String> {
    Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .validate_with(|input: &String| -> std::result::Result<(), &'static str> {
            if input.contains('@') {
                Ok(())
            } else {
                Err("an email address must contain '@'")
            }
        })
        .interact_text()
        .map(|input| input.trim().to_string())
        .map_err(|e| SpotCheckError::Config(format!("could not read email: {}", e)))
}
