use crate::args::Args;
use eyre::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "/etc/wavegen.toml";
pub const DEFAULT_DEVICE: &str = "/dev/mem";
/// AXI4-Lite window of the waveform generator IP on the reference design.
pub const DEFAULT_BASE_ADDRESS: u64 = 0x43c0_0000;

/// Contents of the configuration file. Every key is optional.
#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub device: Option<PathBuf>,
    pub base_address: Option<u64>,
}

impl FileConfig {
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read {}", path.display()))?;
        Self::parse(&text).wrap_err_with(|| format!("failed to parse {}", path.display()))
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Config {
    pub device: PathBuf,
    pub base_address: u64,
}

impl Config {
    /// Command-line flags win over the file, the file wins over the defaults.
    pub fn merge(args: &Args, file: FileConfig) -> Self {
        Self {
            device: args
                .device
                .clone()
                .or(file.device)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DEVICE)),
            base_address: args
                .base
                .or(file.base_address)
                .unwrap_or(DEFAULT_BASE_ADDRESS),
        }
    }

    /// An explicitly named file must exist; the default one is optional.
    pub fn resolve(args: &Args) -> Result<Self> {
        let file = match &args.config {
            Some(path) => FileConfig::load(path)?,
            None => {
                let path = Path::new(DEFAULT_CONFIG_PATH);
                if path.is_file() {
                    tracing::debug!("using configuration from {}", path.display());
                    FileConfig::load(path)?
                } else {
                    FileConfig::default()
                }
            }
        };
        let config = Self::merge(args, file);
        tracing::debug!(
            "register block at {:#x} through {}",
            config.base_address,
            config.device.display()
        );
        Ok(config)
    }
}
