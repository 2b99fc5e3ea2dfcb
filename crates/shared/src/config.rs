//! Application configuration management.

use serde::Deserialize;

use crate::jwt;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// Object storage configuration.
    #[serde(default)]
    pub storage: StorageSettings,
    /// Admin allowlist.
    #[serde(default)]
    pub admin: AdminConfig,
    /// Upload workflow tuning.
    #[serde(default)]
    pub upload: UploadConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT section of the configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Shared HS256 secret of the auth provider.
    pub secret: String,
    /// Lifetime of tokens minted locally (seeder, tests).
    #[serde(default = "default_access_token_minutes")]
    pub access_token_expires_minutes: i64,
}

fn default_access_token_minutes() -> i64 {
    60
}

impl From<&JwtSettings> for jwt::JwtConfig {
    fn from(settings: &JwtSettings) -> Self {
        Self {
            secret: settings.secret.clone(),
            access_token_expires_minutes: settings.access_token_expires_minutes,
        }
    }
}

/// Object storage backend selection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageProvider {
    /// S3-compatible storage (AWS S3, Cloudflare R2, Supabase, MinIO).
    S3 {
        /// Endpoint URL; empty for AWS.
        #[serde(default)]
        endpoint: String,
        /// Access key ID.
        access_key_id: String,
        /// Secret access key.
        secret_access_key: String,
        /// Region; "auto" for R2.
        #[serde(default = "default_region")]
        region: String,
    },
    /// Azure Blob Storage.
    AzureBlob {
        /// Storage account name.
        account: String,
        /// Storage account key.
        access_key: String,
    },
    /// Local filesystem, one directory per bucket under `root`.
    LocalFs {
        /// Root directory.
        root: String,
    },
    /// In-process memory.
    Memory,
}

fn default_region() -> String {
    "auto".to_string()
}

impl Default for StorageProvider {
    fn default() -> Self {
        Self::LocalFs {
            root: "./storage".to_string(),
        }
    }
}

/// Object storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Backend provider.
    #[serde(default)]
    pub provider: StorageProvider,
    /// Bucket for installable packages.
    #[serde(default = "default_package_bucket")]
    pub package_bucket: String,
    /// Bucket for app images.
    #[serde(default = "default_image_bucket")]
    pub image_bucket: String,
    /// Base URL under which `{bucket}/{path}` is publicly readable.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

fn default_package_bucket() -> String {
    "app-files".to_string()
}

fn default_image_bucket() -> String {
    "app-image".to_string()
}

fn default_public_base_url() -> String {
    "http://localhost:8080/storage".to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            provider: StorageProvider::default(),
            package_bucket: default_package_bucket(),
            image_bucket: default_image_bucket(),
            public_base_url: default_public_base_url(),
        }
    }
}

/// Admin configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminConfig {
    /// Comma-separated emails promoted to admin on first sign-in.
    #[serde(default)]
    pub emails: String,
}

/// What an upload does when the record store lacks a non-essential column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaDriftPolicy {
    /// Fail the upload and roll back the blob.
    Strict,
    /// Retry without the missing column and report a warning.
    #[default]
    Degrade,
}

/// Upload workflow configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Behaviour on a missing non-essential column.
    #[serde(default)]
    pub schema_drift: SchemaDriftPolicy,
    /// Serialise uploads per app within this process.
    #[serde(default)]
    pub serialize_per_owner: bool,
    /// Timeout for package uploads.
    #[serde(default = "default_package_timeout")]
    pub package_timeout_secs: u64,
    /// Timeout for image uploads.
    #[serde(default = "default_image_timeout")]
    pub image_timeout_secs: u64,
}

fn default_package_timeout() -> u64 {
    300
}

fn default_image_timeout() -> u64 {
    60
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            schema_drift: SchemaDriftPolicy::default(),
            serialize_per_owner: false,
            package_timeout_secs: default_package_timeout(),
            image_timeout_secs: default_image_timeout(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FOLIO").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("RUN_MODE", Some("test-nonexistent")),
                ("FOLIO__SERVER__HOST", Some("127.0.0.1")),
                ("FOLIO__DATABASE__URL", Some("postgres://localhost/folio")),
                ("FOLIO__JWT__SECRET", Some("secret")),
                ("FOLIO__ADMIN__EMAILS", Some("Owner@Example.com")),
                ("FOLIO__UPLOAD__SCHEMA_DRIFT", Some("strict")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.server.host, "127.0.0.1");
                assert_eq!(config.server.port, 8080);
                assert_eq!(config.database.url, "postgres://localhost/folio");
                assert_eq!(config.database.max_connections, 10);
                assert_eq!(config.jwt.secret, "secret");
                assert_eq!(config.admin.emails, "Owner@Example.com");
                assert_eq!(config.upload.schema_drift, SchemaDriftPolicy::Strict);
                assert!(!config.upload.serialize_per_owner);
                assert_eq!(config.storage.package_bucket, "app-files");
                assert_eq!(config.storage.image_bucket, "app-image");
            },
        );
    }

    #[test]
    fn test_load_fails_without_database_url() {
        temp_env::with_vars(
            [
                ("RUN_MODE", Some("test-nonexistent")),
                ("FOLIO__SERVER__HOST", Some("127.0.0.1")),
                ("FOLIO__DATABASE__URL", None),
                ("FOLIO__JWT__SECRET", Some("secret")),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }

    #[test]
    fn test_upload_defaults() {
        let upload = UploadConfig::default();
        assert_eq!(upload.schema_drift, SchemaDriftPolicy::Degrade);
        assert_eq!(upload.package_timeout_secs, 300);
        assert_eq!(upload.image_timeout_secs, 60);
    }

    #[test]
    fn test_storage_provider_from_json() {
        let settings: StorageSettings = serde_json::from_str(
            r#"{"provider":{"type":"s3","access_key_id":"k","secret_access_key":"s"}}"#,
        )
        .unwrap();
        assert_eq!(
            settings.provider,
            StorageProvider::S3 {
                endpoint: String::new(),
                access_key_id: "k".into(),
                secret_access_key: "s".into(),
                region: "auto".into(),
            }
        );
        assert_eq!(settings.package_bucket, "app-files");

        let memory: StorageSettings =
            serde_json::from_str(r#"{"provider":{"type":"memory"}}"#).unwrap();
        assert_eq!(memory.provider, StorageProvider::Memory);
    }

    #[test]
    fn test_jwt_settings_convert() {
        let settings = JwtSettings {
            secret: "abc".into(),
            access_token_expires_minutes: 5,
        };
        let config = jwt::JwtConfig::from(&settings);
        assert_eq!(config.secret, "abc");
        assert_eq!(config.access_token_expires_minutes, 5);
    }
}
