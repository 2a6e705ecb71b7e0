use anyhow::{Context, Result};
use config::{Config, File as ConfigFile};
use nameservice_types::Coins;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// File looked up inside the data directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "nameservice.toml";
pub const DEFAULT_DATA_DIR: &str = "./data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub min_price: Coins,
    pub log_level: String,
    pub log_format: String,
}

impl AppConfig {
    /// Layer an optional TOML file under `NAMESERVICE_*` environment
    /// variables. Command-line overrides are applied by the caller.
    pub fn load(config_path_override: Option<&Path>, data_dir: Option<&Path>) -> Result<Self> {
        let resolved_path = if let Some(path) = config_path_override {
            if !path.exists() {
                anyhow::bail!(
                    "Configuration file {} not found (specified via --config)",
                    path.display()
                );
            }
            Some(path.to_path_buf())
        } else {
            let path = data_dir
                .unwrap_or_else(|| Path::new(DEFAULT_DATA_DIR))
                .join(DEFAULT_CONFIG_FILE);
            if path.exists() {
                Some(path)
            } else {
                None
            }
        };

        let mut builder = Config::builder();

        if let Some(path) = &resolved_path {
            builder = builder.add_source(ConfigFile::from(path.as_path()));
        }

        builder = builder.add_source(config::Environment::with_prefix("NAMESERVICE"));

        let config = builder.build()?;

        let min_price = config
            .get_string("min_price")
            .ok()
            .map(|raw| {
                raw.parse::<Coins>()
                    .with_context(|| format!("invalid min_price {raw:?}"))
            })
            .transpose()?
            .unwrap_or_else(Coins::default_min_price);

        let log_format = config
            .get_string("log_format")
            .unwrap_or_else(|_| "pretty".to_string());
        if log_format != "pretty" && log_format != "json" {
            anyhow::bail!("log_format must be \"pretty\" or \"json\", got {log_format:?}");
        }

        Ok(Self {
            data_dir: config
                .get_string("data_dir")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR)),
            min_price,
            log_level: config
                .get_string("log_level")
                .unwrap_or_else(|_| "info".to_string()),
            log_format,
        })
    }
}

pub fn init_logging(config: &AppConfig) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    if config.log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    }

    Ok(())
}
