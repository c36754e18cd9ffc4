use jsonwebtoken::Algorithm;
use time::Duration;

const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

/// JWT signing settings
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Secret for signing and verifying tokens
    pub jwt_secret: Vec<u8>,
    /// Always HS256 today
    pub algorithm: Algorithm,
    /// Lifetime of minted access tokens
    pub token_ttl: Duration,
}

impl SecurityConfig {
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
            token_ttl: Duration::seconds(DEFAULT_TOKEN_TTL_SECS),
        }
    }

    pub fn with_token_ttl_secs(mut self, secs: i64) -> Self {
        self.token_ttl = Duration::seconds(secs);
        self
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self::new(b"default_secret_for_tests_only".to_vec())
    }
}
