use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::http::range::SuffixMode;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_FRONTEND_DIR: &str = "frontend";

#[derive(Deserialize, Default, Debug)]
pub struct FileConfig {
    pub port: Option<u16>,
    pub localhost: Option<bool>,
    pub data_dir: Option<PathBuf>,
    pub frontend_dir: Option<PathBuf>,
    pub suffix_ranges: Option<SuffixMode>,
}

#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub localhost: bool,
    pub data_dir: PathBuf,
    pub frontend_dir: PathBuf,
    pub suffix_ranges: SuffixMode,
}

impl Config {
    /// CLI flags win over the config file, which wins over defaults.
    pub fn resolve(file: Option<FileConfig>, args: &crate::cli::Args) -> Self {
        let file = file.unwrap_or_default();
        Config {
            port: args.port.or(file.port).unwrap_or(DEFAULT_PORT),
            localhost: args.localhost || file.localhost.unwrap_or(false),
            data_dir: args
                .data_dir
                .clone()
                .or(file.data_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            frontend_dir: args
                .frontend
                .clone()
                .or(file.frontend_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_FRONTEND_DIR)),
            suffix_ranges: args
                .suffix_ranges
                .map(SuffixMode::from)
                .or(file.suffix_ranges)
                .unwrap_or_default(),
        }
    }

    pub fn bind_addr(&self) -> String {
        let host = if self.localhost { "127.0.0.1" } else { "0.0.0.0" };
        format!("{}:{}", host, self.port)
    }
}

pub fn find_config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_owned());
    }
    let cwd_config = PathBuf::from("couchtv.toml");
    if cwd_config.exists() {
        return Some(cwd_config);
    }
    if let Some(config_dir) = dirs::config_dir() {
        let xdg_config = config_dir.join("couchtv").join("config.toml");
        if xdg_config.exists() {
            return Some(xdg_config);
        }
    }
    None
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

pub fn load_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: FileConfig = toml::from_str(&content)?;
    Ok(config)
}
