use crate::cli::credentials::{email_path, read_email, store_email};
use crate::cli::formatter::{print_success, print_tip};
use crate::core::config::load_or_default;
use clap::{Args, Subcommand};
use std::path::Path;

#[derive(Args)]
pub struct EmailArgs {
    #[command(subcommand)]
    pub command: EmailCommands,
}

#[derive(Subcommand)]
pub enum EmailCommands {
    /// Print the stored contact email
    Show,

    /// Store a new contact email
    Set {
        /// Email address sent to NCBI with each request
        address: String,
    },

    /// Remove the stored contact email
    Clear,
}

pub fn run(args: EmailArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_or_default(config_path)?;
    let path = email_path(&config);

    match args.command {
        EmailCommands::Show => {
            if let Some(email) = config.contact.email.as_deref().filter(|e| !e.trim().is_empty()) {
                println!("{}", email.trim());
            } else if let Some(email) = read_email(&path)? {
                println!("{}", email);
            } else {
                print_tip("No contact email stored; set one with `spotcheck email set <address>`");
            }
        }
        EmailCommands::Set { address } => {
            store_email(&path, &address)?;
            print_success(&format!("Saved contact email to {}", path.display()));
        }
        EmailCommands::Clear => {
            if path.exists() {
                std::fs::remove_file(&path)?;
                print_success(&format!("Removed {}", path.display()));
            } else {
                print_tip("No contact email stored");
            }
        }
    }
    Ok(())
}
