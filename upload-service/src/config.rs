// upload-service/src/config.rs

use shared::{ConfigError, EnvReader};
use std::fmt;

const DEFAULT_FRONTEND_ORIGIN: &str = "http://localhost:3000";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Application configuration, loaded once at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub frontend_origin: String,
    pub max_upload_bytes: usize,
}

#[derive(Clone)]
pub struct StorageConfig {
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    pub bucket: String,
    /// S3-compatible endpoint (MinIO, LocalStack); `None` means AWS
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub uri: String,
    pub name: String,
    pub collection: String,
}

impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageConfig")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_reader(&EnvReader::process())
    }

    pub fn from_reader<F>(env: &EnvReader<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Config {
            server: ServerConfig {
                host: env.or_default("SERVER_HOST", "0.0.0.0"),
                port: env.parse_or("SERVER_PORT", 8080)?,
                frontend_origin: env.or_default("FRONTEND_ORIGIN", DEFAULT_FRONTEND_ORIGIN),
                max_upload_bytes: env.parse_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            },
            storage: StorageConfig {
                access_key: env.required("AWS_ACCESS_KEY")?,
                secret_key: env.required("AWS_SECRET_KEY")?,
                region: env.required("AWS_REGION")?,
                bucket: env.required("AWS_BUCKET")?,
                endpoint: env
                    .optional("AWS_ENDPOINT_URL")
                    .map(|url| url.trim_end_matches('/').to_string()),
            },
            database: DatabaseConfig {
                uri: env.required("MONGODB_CONN_URI")?,
                name: env.required("MONGODB_DB_NAME")?,
                collection: env.required("COLLECTION_NAME")?,
            },
        })
    }
}
