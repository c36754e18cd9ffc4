use std::str::FromStr;

use super::var_or;
use crate::error::AppError;

/// How outgoing mail is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailMode {
    /// Write each message to the structured log
    Log,
    /// Drop messages silently
    Disabled,
}

impl FromStr for EmailMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "log" | "console" => Ok(EmailMode::Log),
            "disabled" | "off" | "none" => Ok(EmailMode::Disabled),
            other => Err(AppError::config(format!("Unknown EMAIL_MODE '{other}'"))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub mode: EmailMode,
    pub from_address: String,
    /// Base for links placed in emails, without trailing slash
    pub public_base_url: String,
}

impl EmailConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            mode: var_or("EMAIL_MODE", "log").parse()?,
            from_address: var_or("DEFAULT_FROM_EMAIL", "noreply@ems.local"),
            public_base_url: var_or("PUBLIC_BASE_URL", "http://localhost:3000")
                .trim_end_matches('/')
                .to_string(),
        })
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            mode: EmailMode::Log,
            from_address: "noreply@ems.local".to_string(),
            public_base_url: "http://localhost:3000".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn defaults_when_unset() {
        env::remove_var("EMAIL_MODE");
        env::remove_var("DEFAULT_FROM_EMAIL");
        env::set_var("PUBLIC_BASE_URL", "https://ems.example.com/");

        let cfg = EmailConfig::from_env().unwrap();
        assert_eq!(cfg.mode, EmailMode::Log);
        assert_eq!(cfg.from_address, "noreply@ems.local");
        assert_eq!(cfg.public_base_url, "https://ems.example.com");

        env::remove_var("PUBLIC_BASE_URL");
    }

    #[test]
    fn parses_modes() {
        assert_eq!("Disabled".parse::<EmailMode>().unwrap(), EmailMode::Disabled);
        assert!("smtp".parse::<EmailMode>().is_err());
    }
}
