use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    /// Argon2 PHC string of the shared admin password.
    pub admin_password_hash: String,
    pub token_ttl_hours: i64,
    pub max_body_bytes: usize,
    pub image_max_side: u32,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET is not set"))?;
        let admin_password_hash = env::var("ADMIN_PASSWORD_HASH")
            .map_err(|_| anyhow::anyhow!("ADMIN_PASSWORD_HASH is not set"))?;
        let token_ttl_hours = env::var("TOKEN_TTL_HOURS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|h| *h > 0)
            .unwrap_or(12);
        let max_body_bytes = env::var("MAX_BODY_BYTES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(16 * 1024 * 1024);
        let image_max_side = env::var("IMAGE_MAX_SIDE")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|s| *s > 0)
            .unwrap_or(800);
        Ok(Self {
            port,
            database_url,
            host,
            jwt_secret,
            admin_password_hash,
            token_ttl_hours,
            max_body_bytes,
            image_max_side,
        })
    }
}
