//! Status lines for interactive commands. Results go to stdout, notices to stderr.

use colored::*;

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), format!("Warning: {}", message).yellow());
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green().bold(), message);
}

/// Print a tip
pub fn print_tip(message: &str) {
    eprintln!("{} {}", "→".cyan(), format!("Tip: {}", message).dimmed());
}

/// Check if colors should be disabled
pub fn colors_enabled() -> bool {
    std::env::var("NO_COLOR").is_err()
        && std::env::var("CLICOLOR").unwrap_or_else(|_| "1".to_string()) != "0"
}

/// Initialize the formatter (sets up colored output)
pub fn init() {
    if !colors_enabled() {
        colored::control::set_override(false);
    }
}
