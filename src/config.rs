use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use crate::currency::DEFAULT_HOME_CURRENCY;

pub const ENV_CONFIG_PATH: &str = "ITINORM_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config/itinorm.toml";

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub access: AccessSettings,
    pub source: SourceSettings,
    pub currency: CurrencySettings,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AccessSettings {
    /// Shared secret. Unset means the gate is not configured.
    pub password: Option<String>,
    /// Add `Secure` to the session cookie.
    pub secure_cookie: bool,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SourceSettings {
    /// Exported query result. Unset means the source is not configured.
    pub path: Option<PathBuf>,
    pub preset: String,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            path: None,
            preset: "notion".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CurrencySettings {
    pub home: String,
    /// Saved `latest/<home>` rates response.
    pub rates_path: Option<PathBuf>,
}

impl Default for CurrencySettings {
    fn default() -> Self {
        Self {
            home: DEFAULT_HOME_CURRENCY.to_string(),
            rates_path: None,
        }
    }
}

impl Settings {
    /// Load settings.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (`ITINORM_PASSWORD`, `ITINORM_SOURCE_PATH`, ...)
    /// 2. TOML file: `explicit`, else `$ITINORM_CONFIG`, else
    ///    `config/itinorm.toml` when present
    /// 3. Built-in defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => match std::env::var(ENV_CONFIG_PATH) {
                Ok(p) => Some(PathBuf::from(p)),
                Err(_) => {
                    let fallback = PathBuf::from(DEFAULT_CONFIG_PATH);
                    fallback.exists().then_some(fallback)
                }
            },
        };

        let mut settings = match path {
            Some(p) => Self::from_file(&p)?,
            None => Self::default(),
        };
        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(anyhow!("config file {} does not exist", path.display()));
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Overlay environment values. `lookup` is `std::env::var` outside tests.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(v) = get("ITINORM_PASSWORD") {
            self.access.password = Some(v);
        }
        if let Some(v) = get("ITINORM_SOURCE_PATH") {
            self.source.path = Some(PathBuf::from(v));
        }
        if let Some(v) = get("ITINORM_SOURCE_PRESET") {
            self.source.preset = v;
        }
        if let Some(v) = get("ITINORM_HOME_CURRENCY") {
            self.currency.home = v.to_ascii_uppercase();
        }
        if let Some(v) = get("ITINORM_RATES_PATH") {
            self.currency.rates_path = Some(PathBuf::from(v));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.access.password, None);
        assert_eq!(s.source.preset, "notion");
        assert_eq!(s.currency.home, "TWD");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let s = Settings::from_toml(
            r#"
            [access]
            password = "sakura"

            [source]
            path = "data/trip.json"
            "#,
        )
        .unwrap();
        assert_eq!(s.access.password.as_deref(), Some("sakura"));
        assert!(!s.access.secure_cookie);
        assert_eq!(s.source.path, Some(PathBuf::from("data/trip.json")));
        assert_eq!(s.source.preset, "notion");
        assert_eq!(s.currency.home, "TWD");
    }

    #[test]
    fn env_overrides_file() {
        let mut s = Settings::from_toml("[source]\npreset = \"json\"").unwrap();
        let env: HashMap<&str, &str> = [
            ("ITINORM_SOURCE_PRESET", "jsonl"),
            ("ITINORM_HOME_CURRENCY", "usd"),
            ("ITINORM_PASSWORD", "  "),
        ]
        .into_iter()
        .collect();
        s.apply_env(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(s.source.preset, "jsonl");
        assert_eq!(s.currency.home, "USD");
        // Blank values do not count as configured.
        assert_eq!(s.access.password, None);
    }

    #[test]
    fn missing_explicit_file_is_error() {
        assert!(Settings::from_file(Path::new("/no/such/itinorm.toml")).is_err());
    }

    #[test]
    fn bad_toml_is_error() {
        assert!(Settings::from_toml("[access\npassword=").is_err());
    }
}
