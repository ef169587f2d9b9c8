use std::path::{Path, PathBuf};

use football_playlist_utils::fs_json_util::read_toml;
use serde::Deserialize;

use crate::browser::LaunchConfig;

pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Optional settings file; every key may be omitted.
///
/// ```toml
/// output_dir = "output"
/// chrome_path = "/usr/bin/chromium"
/// remote_debugging_port = 9222
/// sandbox = false
/// ```
#[derive(Clone, PartialEq, Eq, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub output_dir: Option<PathBuf>,
    pub chrome_path: Option<PathBuf>,
    pub remote_debugging_port: Option<u16>,
    pub sandbox: bool,
}

impl Config {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => read_toml(path),
            None => Ok(Self::default()),
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }

    pub fn launch_config(&self) -> LaunchConfig {
        LaunchConfig {
            chrome_path: self.chrome_path.clone(),
            port: self.remote_debugging_port,
            sandbox: self.sandbox,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::Config;

    #[test]
    fn missing_file_means_defaults() {
        let config = Config::load(None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.output_dir(), PathBuf::from("output"));
        assert!(!config.launch_config().sandbox);
    }

    #[test]
    fn partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs_err::write(&path, "output_dir = \"/tmp/playlists\"\nremote_debugging_port = 9222\n")
            .unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.output_dir(), PathBuf::from("/tmp/playlists"));
        let launch = config.launch_config();
        assert_eq!(launch.port, Some(9222));
        assert_eq!(launch.chrome_path, None);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs_err::write(&path, "outptu_dir = \"x\"\n").unwrap();
        assert!(Config::load(Some(&path)).is_err());
    }
}
