use serde::Deserialize;

/// Configuration options specific to the storefront service.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    /// Interface the HTTP server binds to.
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Base URL of the remote catalog API, e.g. `https://dummyjson.com/`.
    #[serde(default = "default_catalog_base_url")]
    pub catalog_base_url: String,
    /// Upper bound for every catalog request.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Key material for signing flash message cookies (at least 64 bytes).
    /// A random key is generated when empty.
    #[serde(default)]
    pub secret_key: String,
    #[serde(default = "default_templates_dir")]
    pub templates_dir: String,
}

fn default_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_catalog_base_url() -> String {
    "https://dummyjson.com/".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_templates_dir() -> String {
    "templates".to_string()
}

#[cfg(feature = "server")]
impl ServerConfig {
    /// Loads `default.yaml` and the optional `{app_env}.yaml` from `config_dir`,
    /// then applies `APP_*` environment overrides.
    pub fn load(
        config_dir: &std::path::Path,
        app_env: Option<&str>,
    ) -> Result<Self, config::ConfigError> {
        use config::{Config, Environment, File, FileFormat};

        let default_path = config_dir.join("default.yaml");
        let mut builder = Config::builder().add_source(
            File::new(&default_path.to_string_lossy(), FileFormat::Yaml).required(false),
        );

        if let Some(app_env) = app_env {
            let env_path = config_dir.join(format!("{app_env}.yaml"));
            builder = builder.add_source(
                File::new(&env_path.to_string_lossy(), FileFormat::Yaml).required(false),
            );
        }

        builder
            .add_source(Environment::with_prefix("APP").try_parsing(true))
            .build()?
            .try_deserialize()
    }
}
