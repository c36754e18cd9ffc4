use super::{must_var, parse_var, var_or};
use crate::error::AppError;

/// Listener, token and CORS settings for the HTTP binary.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    pub cors_allowed_origins: Vec<String>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let token_ttl_secs = parse_var("BACKEND_TOKEN_TTL_SECS", 3600_i64)?;
        if token_ttl_secs <= 0 {
            return Err(AppError::config("BACKEND_TOKEN_TTL_SECS must be positive"));
        }
        Ok(Self {
            host: var_or("BACKEND_HOST", "0.0.0.0"),
            port: parse_var("BACKEND_PORT", 3001_u16)?,
            jwt_secret: must_var("BACKEND_JWT_SECRET")?,
            token_ttl_secs,
            cors_allowed_origins: parse_origins(&var_or("CORS_ALLOWED_ORIGINS", "")),
        })
    }
}

/// Comma separated origins; blanks, `null` and non-http(s) entries are dropped.
/// An empty result falls back to the local frontend.
pub fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .map(|s| s.trim_end_matches('/').to_string())
        .collect();

    if origins.is_empty() {
        vec![
            "http://localhost:3000".to_string(),
            "http://127.0.0.1:3000".to_string(),
        ]
    } else {
        origins
    }
}
