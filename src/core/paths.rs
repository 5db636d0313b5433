use std::path::PathBuf;

/// Name of the contact email sidecar file
pub const EMAIL_FILE_NAME: &str = "spotcheck.email";

/// Get the spotcheck home directory
/// Checks SPOTCHECK_HOME environment variable, falls back to ${HOME}/.spotcheck
pub fn spotcheck_home() -> PathBuf {
    if let Ok(path) = std::env::var("SPOTCHECK_HOME") {
        return PathBuf::from(path);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".spotcheck")
}

/// Get the default configuration file path
pub fn default_config_path() -> PathBuf {
    spotcheck_home().join("config.toml")
}

/// Get the default contact email sidecar, stored next to the executable
pub fn default_email_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| std::fs::canonicalize(exe).ok())
        .and_then(|exe| exe.parent().map(|dir| dir.join(EMAIL_FILE_NAME)))
        .unwrap_or_else(|| spotcheck_home().join(EMAIL_FILE_NAME))
}
