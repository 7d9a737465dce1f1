use std::env;

#[derive(Clone)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: Vec<u8>,
    pub media_dir: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("Invalid PORT"),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "resona.db".to_string()),
            jwt_secret: env::var("JWT_SECRET")
                .expect("JWT_SECRET must be set in .env")
                .into_bytes(),
            media_dir: env::var("MEDIA_DIR").unwrap_or_else(|_| "media".to_string()),
        }
    }
}
