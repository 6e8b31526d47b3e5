use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub llm: LlmConfig,
    pub sandbox: SandboxConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// `*` allows any origin.
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Mongo,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub mongo_uri: Option<String>,
    pub mongo_database: String,
    pub seed_sample_data: bool,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub max_attempts: u32,
}

#[derive(Debug, Clone)]
pub struct SandboxConfig {
    pub url: String,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
                cors_origins: vec!["*".to_string()],
            },
            storage: StorageConfig {
                backend: StorageBackend::Memory,
                mongo_uri: None,
                mongo_database: "mathtutor".to_string(),
                seed_sample_data: true,
            },
            llm: LlmConfig {
                api_key: None,
                base_url: "https://api.openai.com/v1".to_string(),
                model: "gpt-4o-mini".to_string(),
                timeout_secs: 60,
                max_attempts: 3,
            },
            sandbox: SandboxConfig {
                url: "http://localhost:8001".to_string(),
                timeout_secs: 10,
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        // Root .env first, local .env as fallback
        if dotenvy::from_path("../../.env").is_err() {
            dotenvy::dotenv().ok();
        }

        // Determine environment (defaults to dev)
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // config/*.toml + ENV overrides (prefix: APP_)
        let settings = config::Config::builder()
            .add_source(config::File::with_name(&format!("config/{}", app_env)).required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Self::from_sources(&settings, |key| env::var(key).ok())
    }

    /// Resolves every field from `settings`, then the legacy flat variable
    /// returned by `lookup`, then the default.
    pub fn from_sources<F>(settings: &config::Config, lookup: F) -> Result<Self, config::ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let string = |key: &str, legacy: Option<&str>| -> Option<String> {
            settings
                .get_string(key)
                .ok()
                .or_else(|| legacy.and_then(&lookup))
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let host = string("server.host", Some("API_HOST")).unwrap_or(defaults.server.host);
        let port = parse_or(
            "server.port",
            string("server.port", Some("API_PORT")),
            defaults.server.port,
        )?;
        let cors_origins = string("server.cors_origins", Some("CORS_ORIGINS"))
            .map(|raw| split_origins(&raw))
            .filter(|origins| !origins.is_empty())
            .unwrap_or(defaults.server.cors_origins);

        let backend = match string("storage.backend", Some("STORAGE_BACKEND")) {
            None => defaults.storage.backend,
            Some(raw) => match raw.to_ascii_lowercase().as_str() {
                "memory" => StorageBackend::Memory,
                "mongo" | "mongodb" => StorageBackend::Mongo,
                other => {
                    return Err(config::ConfigError::Message(format!(
                        "storage.backend must be `memory` or `mongo`, got `{}`",
                        other
                    )))
                }
            },
        };
        let mongo_uri = string("storage.mongo_uri", Some("MONGO_URI"));
        if backend == StorageBackend::Mongo && mongo_uri.is_none() {
            return Err(config::ConfigError::Message(
                "storage.mongo_uri (or MONGO_URI) must be set for the mongo backend".to_string(),
            ));
        }
        let mongo_database = string("storage.mongo_database", Some("MONGO_DATABASE"))
            .unwrap_or(defaults.storage.mongo_database);
        let seed_sample_data = parse_or(
            "storage.seed_sample_data",
            string("storage.seed_sample_data", Some("SEED_SAMPLE_DATA")),
            defaults.storage.seed_sample_data,
        )?;

        let api_key = string("llm.api_key", Some("OPENAI_API_KEY"));
        if api_key.is_none() {
            eprintln!("WARNING: OPENAI_API_KEY is not set, LLM endpoints will fail");
        }
        let base_url = string("llm.base_url", Some("OPENAI_BASE_URL"))
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.llm.base_url);
        let model = string("llm.model", Some("OPENAI_MODEL")).unwrap_or(defaults.llm.model);
        let llm_timeout = parse_or(
            "llm.timeout_secs",
            string("llm.timeout_secs", None),
            defaults.llm.timeout_secs,
        )?;
        let max_attempts = parse_or(
            "llm.max_attempts",
            string("llm.max_attempts", None),
            defaults.llm.max_attempts,
        )?
        .max(1);

        let sandbox_url = string("sandbox.url", Some("PLOT_SANDBOX_URL"))
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.sandbox.url);
        let sandbox_timeout = parse_or(
            "sandbox.timeout_secs",
            string("sandbox.timeout_secs", None),
            defaults.sandbox.timeout_secs,
        )?;

        Ok(Config {
            server: ServerConfig {
                host,
                port,
                cors_origins,
            },
            storage: StorageConfig {
                backend,
                mongo_uri,
                mongo_database,
                seed_sample_data,
            },
            llm: LlmConfig {
                api_key,
                base_url,
                model,
                timeout_secs: llm_timeout,
                max_attempts,
            },
            sandbox: SandboxConfig {
                url: sandbox_url,
                timeout_secs: sandbox_timeout,
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T, config::ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|e| config::ConfigError::Message(format!("{}: {}", key, e))),
    }
}
