use std::path::PathBuf;

use serde::Deserialize;

/// Optional settings from `$XDG_CONFIG_HOME/droidtail/config.toml`.
/// CLI arguments override anything set here.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// How many log entries to retain
    pub capacity: Option<usize>,

    /// Explicit path to the adb binary
    pub adb_path: Option<PathBuf>,
}

impl Config {
    /// Load the config file if one exists. A missing file is the normal
    /// case; a file that does not parse is reported and ignored.
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };
        let Ok(text) = std::fs::read_to_string(&path) else {
            return Self::default();
        };

        match toml::from_str(&text) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "ignoring unparseable config file");
                Self::default()
            }
        }
    }

    fn path() -> Option<PathBuf> {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
        Some(base.join("droidtail").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            r#"
            capacity = 500
            adb_path = "/opt/sdk/platform-tools/adb"
            "#,
        )
        .unwrap();
        assert_eq!(config.capacity, Some(500));
        assert_eq!(
            config.adb_path,
            Some(PathBuf::from("/opt/sdk/platform-tools/adb"))
        );
    }

    #[test]
    fn test_parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.capacity.is_none());
        assert!(config.adb_path.is_none());
    }
}
