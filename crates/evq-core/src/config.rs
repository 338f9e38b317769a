//! Configuration types for evq.
//!
//! [`Config::load`] layers, in increasing precedence: the embedded defaults,
//! an optional `evq.toml` in the working directory (or an explicit file),
//! `EVQ_`-prefixed environment variables (`EVQ_SERVER__PORT=8080`) and the
//! bare `PORT` variable. [`Config::defaults`] returns the embedded defaults
//! without touching the filesystem (useful in tests).

use serde::Deserialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 3000

[source]
path  = "./events.json"
watch = true
"#;

/// Looked up in the working directory when no explicit file is given.
const DEFAULT_FILE_STEM: &str = "evq";

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub source: SourceConfig,
}

/// `[server]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// `host:port`, ready for `TcpListener::bind`.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// `[source]` section: where the event document lives.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_source_path")]
    pub path: PathBuf,
    /// Reload the document whenever it changes on disk.
    #[serde(default = "default_watch")]
    pub watch: bool,
}

fn default_source_path() -> PathBuf {
    PathBuf::from("./events.json")
}

fn default_watch() -> bool {
    true
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: default_source_path(),
            watch: default_watch(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load the layered configuration. An explicit `file` must exist; the
    /// implicit `evq.toml` is optional.
    pub fn load(file: Option<&Path>) -> anyhow::Result<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml));

        let builder = match file {
            Some(path) => builder.add_source(config::File::from(path).required(true)),
            None => builder.add_source(config::File::with_name(DEFAULT_FILE_STEM).required(false)),
        };

        let mut builder = builder.add_source(
            config::Environment::with_prefix("EVQ")
                .separator("__")
                .try_parsing(true),
        );
        if let Ok(port) = std::env::var("PORT") {
            builder = builder.set_override("server.port", port)?;
        }

        builder.build()?.try_deserialize().map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
