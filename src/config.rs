//! # Modeller Configuration
//!
//! Environment-driven settings for the `resmodel` binary.
//!
//! ## Environment Variables
//!
//! ### `RESMODEL_TAGS`
//!
//! Path to a TOML tag table (see [`crate::tags`]) used instead of the
//! standard one. A `--tags` flag on the command line overrides it.
//!
//! ```bash
//! export RESMODEL_TAGS=./tags.toml
//! resmodel inspect --classes demos/colours.yaml
//! ```

use crate::tags::TagTable;
use anyhow::Result;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModellerConfig {
    /// Alternate tag table file; `None` selects the standard table.
    pub tag_table: Option<PathBuf>,
}

impl ModellerConfig {
    pub fn from_env() -> Self {
        let tag_table = env::var_os("RESMODEL_TAGS")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        ModellerConfig { tag_table }
    }

    /// Replace the configured table path, if `path` is given.
    pub fn with_tag_table(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.tag_table = path;
        }
        self
    }

    /// Load the configured tag table.
    ///
    /// # Errors
    ///
    /// Propagates read and parse failures of the table file.
    pub fn tag_table(&self) -> Result<TagTable> {
        match &self.tag_table {
            Some(path) => {
                let table = TagTable::load(path)?;
                tracing::debug!(path = %path.display(), "loaded tag table");
                Ok(table)
            }
            None => Ok(TagTable::standard().clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_uses_standard_table() {
        let config = ModellerConfig::default();
        assert_eq!(&config.tag_table().unwrap(), TagTable::standard());
    }

    #[test]
    fn test_flag_overrides_configured_path() {
        let config = ModellerConfig {
            tag_table: Some(PathBuf::from("env.toml")),
        };
        let config = config.with_tag_table(Some(PathBuf::from("flag.toml")));
        assert_eq!(config.tag_table, Some(PathBuf::from("flag.toml")));
        let config = config.with_tag_table(None);
        assert_eq!(config.tag_table, Some(PathBuf::from("flag.toml")));
    }

    #[test]
    fn test_loads_table_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "consumes = \"Accepts\"").unwrap();
        let config = ModellerConfig::default().with_tag_table(Some(file.path().to_path_buf()));
        assert_eq!(config.tag_table().unwrap().consumes, "Accepts");
    }

    #[test]
    fn test_missing_table_file_is_an_error() {
        let config = ModellerConfig::default()
            .with_tag_table(Some(PathBuf::from("/nonexistent/resmodel-tags.toml")));
        assert!(config.tag_table().is_err());
    }
}
