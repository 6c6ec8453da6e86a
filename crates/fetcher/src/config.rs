//! Browse configuration.
//!
//! [`BrowseConfig::load`] layers, lowest precedence first: the embedded
//! defaults, an optional TOML file, then `BLOG_ARCHIVE_*` environment
//! variables (`__` separates nested keys, e.g. `BLOG_ARCHIVE_SORT__DEFAULT_COLUMN`).

use crate::error::ConfigError;
use query::{SortAllowList, SortDirection, DEFAULT_SORT_COLUMNS};
use serde::Deserialize;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
database  = "Data/gamedeveloper_blogs.db"
page_size = 20

[sort]
columns           = ["Date", "Title", "Authors", "CategoryName"]
default_column    = "Date"
default_direction = "DESC"
"#;

const ENV_PREFIX: &str = "BLOG_ARCHIVE";

// ---------------------------------------------------------------------------
// Config types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct BrowseConfig {
    /// SQLite archive to browse.
    pub database: PathBuf,
    /// Rows per page; must be positive.
    pub page_size: u32,
    #[serde(default)]
    pub sort: SortConfig,
}

/// `[sort]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SortConfig {
    pub columns: Vec<String>,
    pub default_column: String,
    pub default_direction: String,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_SORT_COLUMNS.iter().map(|c| c.to_string()).collect(),
            default_column: "Date".to_string(),
            default_direction: "DESC".to_string(),
        }
    }
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self::defaults()
    }
}

impl BrowseConfig {
    /// Load the layered configuration. A file passed explicitly must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml));
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        let config: Self = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Built-in defaults without touching the filesystem or environment.
    pub fn defaults() -> Self {
        Self {
            database: PathBuf::from("Data/gamedeveloper_blogs.db"),
            page_size: 20,
            sort: SortConfig::default(),
        }
    }

    /// Check every derived value once, so later accessors cannot surprise.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.page_size()?;
        self.default_sort()?;
        Ok(())
    }

    pub fn page_size(&self) -> Result<NonZeroU32, ConfigError> {
        NonZeroU32::new(self.page_size).ok_or(ConfigError::ZeroPageSize)
    }

    pub fn allow_list(&self) -> Result<SortAllowList, ConfigError> {
        Ok(SortAllowList::new(&self.sort.columns)?)
    }

    /// Fallback sort; the column must be in the allow-list.
    pub fn default_sort(&self) -> Result<(String, SortDirection), ConfigError> {
        let direction = SortDirection::from_str(&self.sort.default_direction)?;
        let clause = self.allow_list()?.validate(&self.sort.default_column, direction)?;
        Ok((clause.column().to_string(), clause.direction()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let cfg = BrowseConfig::defaults();
        assert_eq!(cfg.page_size().unwrap().get(), 20);
        assert_eq!(cfg.database, PathBuf::from("Data/gamedeveloper_blogs.db"));
        assert_eq!(
            cfg.default_sort().unwrap(),
            ("Date".to_string(), SortDirection::Descending)
        );
        assert!(cfg.allow_list().unwrap().contains("CategoryName"));
    }

    #[test]
    fn test_embedded_defaults_match() {
        let cfg = BrowseConfig::load(None).unwrap();
        assert_eq!(cfg.sort.columns, BrowseConfig::defaults().sort.columns);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "page_size = 50\n\n[sort]\ndefault_column = \"Title\"\ndefault_direction = \"asc\"").unwrap();

        let cfg = BrowseConfig::load(Some(file.path())).unwrap();

        assert_eq!(cfg.page_size().unwrap().get(), 50);
        assert_eq!(
            cfg.default_sort().unwrap(),
            ("Title".to_string(), SortDirection::Ascending)
        );
        assert_eq!(cfg.sort.columns.len(), 4);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let cfg = BrowseConfig {
            page_size: 0,
            ..BrowseConfig::defaults()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::ZeroPageSize)));
    }

    #[test]
    fn test_default_column_must_be_allowed() {
        let mut cfg = BrowseConfig::defaults();
        cfg.sort.default_column = "Summary".to_string();
        assert!(matches!(cfg.default_sort(), Err(ConfigError::Sort(_))));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = BrowseConfig::load(Some(Path::new("/nonexistent/browse.toml")));
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }
}
