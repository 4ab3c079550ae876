use std::path::{Path, PathBuf};

use anyhow::Context;
use ow_api::Locale;
use ow_diff::{DiffEngine, ListMatching};
use ow_notify::{MAX_LISTED_CHANGES, TELEGRAM_CONFIG_FILE};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "orderwatch.toml";

/// Label used for orders in change reports.
pub const ORDER_LABEL: &str = "Order";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Base directory for relative file paths below.
    pub data_dir: PathBuf,
    pub token_file: PathBuf,
    pub orders_file: PathBuf,
    pub telegram_file: PathBuf,
    pub device_language: String,
    pub device_country: String,
    /// Dotted key pairing orders across snapshots, e.g.
    /// `order.referenceNumber`. Positional when unset.
    pub match_orders_by: Option<String>,
    pub max_listed_changes: usize,
}

impl Default for WatchConfig {
    fn default() -> Self {
        let locale = Locale::default();
        Self {
            data_dir: PathBuf::from("."),
            token_file: PathBuf::from("tesla_tokens.json"),
            orders_file: PathBuf::from("tesla_orders.json"),
            telegram_file: PathBuf::from(TELEGRAM_CONFIG_FILE),
            device_language: locale.language,
            device_country: locale.country,
            match_orders_by: None,
            max_listed_changes: MAX_LISTED_CHANGES,
        }
    }
}

impl WatchConfig {
    /// Load `explicit`, or `orderwatch.toml` if present, or the defaults.
    ///
    /// An explicitly named file must exist.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    debug!("no config file, using defaults");
                    return Ok(Self::default());
                }
                default
            }
        };
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    fn resolve(&self, file: &Path) -> PathBuf {
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.data_dir.join(file)
        }
    }

    pub fn token_path(&self) -> PathBuf {
        self.resolve(&self.token_file)
    }

    pub fn orders_path(&self) -> PathBuf {
        self.resolve(&self.orders_file)
    }

    pub fn telegram_path(&self) -> PathBuf {
        self.resolve(&self.telegram_file)
    }

    pub fn locale(&self) -> Locale {
        Locale {
            language: self.device_language.clone(),
            country: self.device_country.clone(),
        }
    }

    /// Engine for order snapshots.
    pub fn diff_engine(&self) -> DiffEngine {
        let engine = DiffEngine::new().with_item_label(ORDER_LABEL);
        match &self.match_orders_by {
            Some(key) => engine.with_list_matching(ListMatching::ByKey(key.clone())),
            None => engine,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = WatchConfig::default();
        assert_eq!(c.data_dir, PathBuf::from("."));
        assert_eq!(c.orders_file, PathBuf::from("tesla_orders.json"));
        assert_eq!(c.telegram_file, PathBuf::from("telegram_config.json"));
        assert_eq!(c.device_language, "en");
        assert_eq!(c.device_country, "DE");
        assert_eq!(c.max_listed_changes, 20);
        assert!(c.match_orders_by.is_none());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let c = WatchConfig::parse("device_country = \"NL\"\nmatch_orders_by = \"order.referenceNumber\"\n").unwrap();
        assert_eq!(c.device_country, "NL");
        assert_eq!(c.device_language, "en");
        assert_eq!(c.match_orders_by.as_deref(), Some("order.referenceNumber"));
        assert_eq!(c.token_file, PathBuf::from("tesla_tokens.json"));
    }

    #[test]
    fn paths_resolve_against_data_dir() {
        let c = WatchConfig::parse("data_dir = \"/var/lib/orderwatch\"\n").unwrap();
        assert_eq!(c.orders_path(), PathBuf::from("/var/lib/orderwatch/tesla_orders.json"));

        let c = WatchConfig::parse("data_dir = \"/data\"\ntoken_file = \"/etc/tokens.json\"\n").unwrap();
        assert_eq!(c.token_path(), PathBuf::from("/etc/tokens.json"));
    }

    #[test]
    fn unknown_value_type_is_rejected() {
        assert!(WatchConfig::parse("max_listed_changes = \"many\"\n").is_err());
    }

    #[test]
    fn explicit_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        assert!(WatchConfig::load(Some(&dir.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn explicit_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orderwatch.toml");
        std::fs::write(&path, "max_listed_changes = 5\n").unwrap();
        let c = WatchConfig::load(Some(&path)).unwrap();
        assert_eq!(c.max_listed_changes, 5);
    }

    #[test]
    fn engine_follows_matching_setting() {
        let c = WatchConfig::default();
        assert_eq!(c.diff_engine().item_label(), "Order");
        assert_eq!(c.diff_engine().list_matching(), &ListMatching::Positional);

        let c = WatchConfig { match_orders_by: Some("order.referenceNumber".into()), ..Default::default() };
        assert_eq!(
            c.diff_engine().list_matching(),
            &ListMatching::ByKey("order.referenceNumber".into())
        );
    }

    #[test]
    fn locale_from_device_fields() {
        let c = WatchConfig { device_language: "de".into(), ..Default::default() };
        assert_eq!(c.locale().language, "de");
        assert_eq!(c.locale().country, "DE");
    }
}
