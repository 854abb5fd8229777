use std::path::PathBuf;

use clap::Parser;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Verzeichnis, unter dem jede Bibliothek ein eigenes Unterverzeichnis hat.
    pub doc_root: PathBuf,
    pub max_upload_bytes: usize,
    pub busy_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SecurityConfig {
    pub enable_hsts: Option<bool>,
    pub hsts_max_age: Option<u64>,
    pub hsts_include_subdomains: Option<bool>,
    pub csp: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub security: Option<SecurityConfig>,
}

/// Command-line flags. Anything given here wins over files and environment.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "dokuwald", version, about = "Document library backend")]
pub struct CliArgs {
    /// Document root directory path
    #[arg(long = "dir", value_name = "PATH")]
    pub dir: Option<PathBuf>,
    /// Port to run the server on
    #[arg(long)]
    pub port: Option<u16>,
    /// Address to bind to
    #[arg(long)]
    pub host: Option<String>,
    /// Additional configuration file (toml or yaml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

const DEFAULTS: &str = include_str!("../config/default.toml");

impl Default for AppConfig {
    fn default() -> Self {
        // Fallback: parse the embedded default TOML
        match ::config::Config::builder()
            .add_source(::config::File::from_str(DEFAULTS, ::config::FileFormat::Toml))
            .build()
        {
            Ok(cfg) => match cfg.try_deserialize() {
                Ok(app_cfg) => app_cfg,
                Err(e) => {
                    eprintln!("FATAL: Failed to deserialize default config: {}", e);
                    panic!("Failed to deserialize default config: {}", e);
                }
            },
            Err(e) => {
                eprintln!("FATAL: Failed to parse default config: {}", e);
                panic!("Failed to parse default config: {}", e);
            }
        }
    }
}

/// Loads the configuration: embedded defaults -> dokuwald.{toml,yaml} -> $DOKUWALD_CONFIG
/// -> DOKUWALD__* environment -> command-line flags.
pub fn load(cli: &CliArgs) -> anyhow::Result<AppConfig> {
    // Load .env first (optional)
    let _ = dotenvy::dotenv();

    let mut builder = ::config::Config::builder()
        .add_source(::config::File::from_str(DEFAULTS, ::config::FileFormat::Toml))
        // Optional local file: dokuwald.toml / dokuwald.yaml (in CWD)
        .add_source(::config::File::with_name("dokuwald").required(false));

    if let Ok(custom_path) = std::env::var("DOKUWALD_CONFIG") {
        builder = builder.add_source(::config::File::with_name(&custom_path).required(false));
    }
    if let Some(path) = cli.config.as_ref() {
        // Explizit angegebene Datei muss existieren
        builder = builder.add_source(::config::File::from(path.clone()).required(true));
    }
    builder = builder.add_source(::config::Environment::with_prefix("DOKUWALD").separator("__"));

    builder = builder
        .set_override_option("storage.doc_root", cli.dir.as_ref().map(|d| d.to_string_lossy().into_owned()))?
        .set_override_option("server.port", cli.port.map(i64::from))?
        .set_override_option("server.host", cli.host.clone())?;

    let cfg = builder.build()?;
    let app_cfg: AppConfig = cfg.try_deserialize()?;
    validate(&app_cfg)?;
    Ok(app_cfg)
}

pub fn validate(cfg: &AppConfig) -> anyhow::Result<()> {
    if cfg.server.port == 0 {
        return Err(anyhow::anyhow!("invalid server.port: {}", cfg.server.port));
    }
    #[cfg(unix)]
    if cfg.server.port < 1024 {
        tracing::warn!("Using privileged port {} - may require elevated permissions", cfg.server.port);
    }

    if cfg.storage.doc_root.as_os_str().is_empty() || cfg.storage.doc_root.to_string_lossy().trim().is_empty() {
        return Err(anyhow::anyhow!("storage.doc_root must not be empty"));
    }
    if cfg.storage.max_upload_bytes == 0 {
        return Err(anyhow::anyhow!("storage.max_upload_bytes must be > 0"));
    }
    if cfg.storage.busy_timeout_ms > 60_000 {
        return Err(anyhow::anyhow!("storage.busy_timeout_ms must be <= 60000"));
    }

    Ok(())
}
