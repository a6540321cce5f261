use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};

use druid::{Data, Lens};
use lazyfeed_core::{error::Error, policy::LoadPolicy};
use platform_dirs::AppDirs;
use serde::{Deserialize, Serialize};

use crate::data::Nav;

const APP_NAME: &str = "Lazyfeed";
const CONFIG_FILENAME: &str = "config.json";

#[derive(Clone, Debug, Data, Lens, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[data(same_fn = "PartialEq::eq")]
    pub scroll: LoadPolicy,
    #[data(same_fn = "PartialEq::eq")]
    pub sentinel: LoadPolicy,
    pub theme: Theme,
    pub last_nav: Nav,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scroll: LoadPolicy::scroll(),
            sentinel: LoadPolicy::sentinel(),
            theme: Theme::default(),
            last_nav: Nav::default(),
        }
    }
}

impl Config {
    fn app_dirs() -> Option<AppDirs> {
        const USE_XDG_ON_MACOS: bool = false;

        AppDirs::new(Some(APP_NAME), USE_XDG_ON_MACOS)
    }

    pub fn config_dir() -> Option<PathBuf> {
        Self::app_dirs().map(|dirs| dirs.config_dir)
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join(CONFIG_FILENAME))
    }

    pub fn load() -> Option<Config> {
        let path = Self::config_path()?;
        if !path.exists() {
            return None;
        }
        log::info!("loading config: {:?}", &path);
        match Self::load_from(&path) {
            Ok(config) => Some(config),
            Err(err) => {
                log::error!("failed to read config: {}", err);
                None
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Config, Error> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }

    pub fn save(&self) -> Result<(), Error> {
        let path = Self::config_path()
            .ok_or_else(|| Error::IoError("no config directory".to_string()))?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), Error> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    pub fn policy(&self, nav: Nav) -> LoadPolicy {
        match nav {
            Nav::ScrollTrigger => self.scroll.clone(),
            Nav::SentinelTrigger => self.sentinel.clone(),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Data, Serialize, Deserialize)]
pub enum Theme {
    Light,
    Dark,
}

impl Default for Theme {
    fn default() -> Self {
        Self::Light
    }
}

#[cfg(test)]
mod tests {
    use lazyfeed_core::policy::MaxCount;

    use super::*;

    #[test]
    fn round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILENAME);
        let config = Config {
            sentinel: LoadPolicy::sentinel().with_max_count(MaxCount::AtMost(500)),
            theme: Theme::Dark,
            last_nav: Nav::SentinelTrigger,
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.sentinel.max_count, MaxCount::AtMost(500));
        assert_eq!(loaded.scroll, LoadPolicy::scroll());
        assert_eq!(loaded.theme, Theme::Dark);
        assert_eq!(loaded.last_nav, Nav::SentinelTrigger);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, r#"{ "theme": "Dark", "scroll": { "delay_ms": 500 } }"#).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.theme, Theme::Dark);
        assert_eq!(loaded.scroll.delay_ms, 500);
        assert_eq!(loaded.scroll.batch_size, 20);
        assert_eq!(loaded.sentinel, LoadPolicy::sentinel());
        assert_eq!(loaded.last_nav, Nav::ScrollTrigger);
    }

    #[test]
    fn broken_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(Error::JsonError(_))
        ));
        assert!(matches!(
            Config::load_from(&dir.path().join("missing.json")),
            Err(Error::IoError(_))
        ));
    }

    #[test]
    fn policy_per_nav() {
        let config = Config::default();
        assert_eq!(config.policy(Nav::ScrollTrigger).initial_count, 50);
        assert_eq!(config.policy(Nav::SentinelTrigger).initial_count, 25);
    }
}
