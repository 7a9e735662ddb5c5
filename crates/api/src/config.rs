//! Startup configuration, read once from the environment.

/// Process configuration.
///
/// The signing secret is loaded exactly once at startup; rotating it
/// invalidates every outstanding token, so that is an operational event,
/// not something the process does at runtime.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt_secret: String,
    pub bind_addr: String,
    pub secure_cookies: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });

        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        // Cookies drop the Secure flag only in local development.
        let secure_cookies = std::env::var("APP_ENV")
            .map(|env| env != "development")
            .unwrap_or(true);

        Self {
            jwt_secret,
            bind_addr,
            secure_cookies,
        }
    }
}
