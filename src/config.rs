use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub grid: GridConfig,
    pub nominatim: NominatimConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GridConfig {
    /// CSV export of the location grid, `.gz` allowed
    pub path: PathBuf,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("db/location_grid.csv"),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct NominatimConfig {
    pub base_url: String,
    /// Nominatim rejects requests without one
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: "LocationGridMCP/1.0".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:3000".to_string(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Config file if given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from_file(p),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("grid.toml");
        fs::write(
            &path,
            "[grid]\npath = \"/data/grid.csv.gz\"\n\n[nominatim]\ntimeout_secs = 3\n",
        )
        .unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.grid.path, PathBuf::from("/data/grid.csv.gz"));
        assert_eq!(config.nominatim.timeout_secs, 3);
        assert_eq!(config.nominatim.user_agent, "LocationGridMCP/1.0");
        assert_eq!(config.server.listen, "0.0.0.0:3000");
    }

    #[test]
    fn test_empty_file_is_default() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.grid.path, PathBuf::from("db/location_grid.csv"));
    }

    #[test]
    fn test_missing_file_errors() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load_or_default(Some(&dir.path().join("nope.toml"))).is_err());
        assert!(Config::load_or_default(None).is_ok());
    }
}
