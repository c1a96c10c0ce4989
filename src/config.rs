use anyhow::{Context, Result};
use secrecy::SecretBox;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub gemini: GeminiConfig,
    pub livekit: LiveKitConfig,
    pub avatar: Option<AvatarConfig>,
    pub app: AppConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
}

// Secrets sit behind an Arc so the Clone-deriving config sections can
// share one redacted copy.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Arc<SecretBox<String>>,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct LiveKitConfig {
    pub api_key: String,
    pub api_secret: Arc<SecretBox<String>>,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct AvatarConfig {
    pub api_key: Arc<SecretBox<String>>,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub name: String,
    pub training_material_path: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Server configuration
        let host = env::var("SERVER_HOST")
            .unwrap_or_else(|_| "0.0.0.0".to_string())
            .parse::<IpAddr>()
            .context("Failed to parse SERVER_HOST")?;

        let port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .context("Failed to parse SERVER_PORT")?;

        // Database configuration
        let db_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let db_max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(val) => Some(val.parse().context("Failed to parse DATABASE_MAX_CONNECTIONS")?),
            Err(_) => Some(10),
        };
        let db_min_connections = match env::var("DATABASE_MIN_CONNECTIONS") {
            Ok(val) => Some(val.parse().context("Failed to parse DATABASE_MIN_CONNECTIONS")?),
            Err(_) => Some(1),
        };

        // Gemini configuration. Credentials are required, there are no baked-in defaults.
        let gemini_api_key = env::var("GEMINI_API_KEY").context("GEMINI_API_KEY must be set")?;
        let gemini_model =
            env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".to_string());

        // LiveKit configuration
        let livekit_api_key =
            env::var("LIVEKIT_API_KEY").context("LIVEKIT_API_KEY must be set")?;
        let livekit_api_secret =
            env::var("LIVEKIT_API_SECRET").context("LIVEKIT_API_SECRET must be set")?;
        let livekit_url = env::var("LIVEKIT_URL").context("LIVEKIT_URL must be set")?;

        // Avatar provider configuration (optional)
        let avatar_config = if let Ok(api_key) = env::var("AVATAR_API_KEY") {
            let base_url = env::var("AVATAR_API_BASE_URL")
                .unwrap_or_else(|_| "https://api.beyondpresence.ai".to_string());

            Some(AvatarConfig {
                api_key: Arc::new(SecretBox::new(Box::new(api_key))),
                base_url,
            })
        } else {
            None
        };

        // App configuration
        let app_name = env::var("APP_NAME").unwrap_or_else(|_| "Examiner Backend".to_string());
        let training_material_path = env::var("TRAINING_MATERIAL_PATH")
            .unwrap_or_else(|_| "training_material.pdf".to_string());

        Ok(Config {
            server: ServerConfig { host, port },
            database: DatabaseConfig {
                url: db_url,
                max_connections: db_max_connections,
                min_connections: db_min_connections,
            },
            gemini: GeminiConfig {
                api_key: Arc::new(SecretBox::new(Box::new(gemini_api_key))),
                model: gemini_model,
            },
            livekit: LiveKitConfig {
                api_key: livekit_api_key,
                api_secret: Arc::new(SecretBox::new(Box::new(livekit_api_secret))),
                url: livekit_url,
            },
            avatar: avatar_config,
            app: AppConfig {
                name: app_name,
                training_material_path,
            },
        })
    }

    pub fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.host, self.server.port)
    }
}

// Use once_cell for a global config instance that's initialized once
use once_cell::sync::OnceCell;

static CONFIG: OnceCell<Config> = OnceCell::new();

pub fn init() -> Result<&'static Config> {
    CONFIG.get_or_try_init(Config::from_env)
}

pub fn get() -> &'static Config {
    CONFIG.get().expect("Config is not initialized")
}
