//! File-level orchestration: loading, default fallback, and saving.
//!
//! [`TomlProvider`] is a plain value the caller constructs and holds; there
//! is no global registry. Loading parses the document through the tree
//! adapter, populates a fresh default instance, and folds in defaults either
//! tree-level (from a defaults document) or instance-level (from a defaults
//! instance). A missing file is a legitimate outcome, not an error:
//! [`load_or_default`](TomlProvider::load_or_default) falls back to a fresh
//! default instance and can persist it on the spot.
//!
//! Saving renders through the document writer, creates parent directories on
//! demand, and (unless disabled) skips the write entirely when the rendered
//! bytes hash identically to what is already on disk.

use std::path::Path;

use sha2::{Digest, Sha256};
use toml::Table;

use crate::error::ConfigError;
use crate::schema::Schema;
use crate::{marshal, merge, writer};

pub struct TomlProvider {
    skip_unchanged: bool,
}

impl TomlProvider {
    pub fn new() -> Self {
        Self {
            skip_unchanged: true,
        }
    }

    /// Control the unchanged-content check on [`save`](Self::save)
    /// (default: on).
    pub fn skip_unchanged(mut self, enabled: bool) -> Self {
        self.skip_unchanged = enabled;
        self
    }

    /// Parse a document and populate a fresh instance from it.
    pub fn load_str<S: Schema>(&self, text: &str) -> Result<S, ConfigError> {
        self.load_str_merged(text, &S::default())
    }

    /// Parse a live document and a defaults document, fill missing keys from
    /// the defaults tree, then populate a fresh instance from the result.
    pub fn load_str_with_defaults<S: Schema>(
        &self,
        text: &str,
        default_text: &str,
    ) -> Result<S, ConfigError> {
        let live: Table = toml::from_str(text)?;
        let defaults: Table = toml::from_str(default_text)?;
        let tree = merge::fill_defaults(live, defaults);

        let mut config = S::default();
        marshal::populate(&mut config, &tree)?;
        Ok(config)
    }

    /// Load from a file. I/O and parse errors propagate.
    pub fn load<S: Schema>(&self, path: &Path) -> Result<S, ConfigError> {
        self.load_str(&read(path)?)
    }

    /// Load from a file, folding entry defaults in from `defaults` instead
    /// of from a fresh default instance.
    pub fn load_with_defaults<S: Schema>(
        &self,
        path: &Path,
        defaults: &S,
    ) -> Result<S, ConfigError> {
        self.load_str_merged(&read(path)?, defaults)
    }

    /// Load from a file, falling back to a fresh default instance when the
    /// file does not exist. With `save_default`, the fallback instance is
    /// persisted immediately.
    pub fn load_or_default<S: Schema>(
        &self,
        path: &Path,
        save_default: bool,
    ) -> Result<S, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => self.load_str(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let config = S::default();
                if save_default {
                    self.save(&config, path)?;
                }
                Ok(config)
            }
            Err(e) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            }),
        }
    }

    /// The document the instance would be saved as.
    pub fn render<S: Schema>(&self, instance: &S) -> String {
        writer::to_document(instance)
    }

    /// Write the instance's document to `path`, creating parent directories
    /// as needed. Returns `false` when the write was skipped because the
    /// file already holds identical content.
    pub fn save<S: Schema>(&self, instance: &S, path: &Path) -> Result<bool, ConfigError> {
        let rendered = writer::to_document(instance);

        if self.skip_unchanged
            && let Ok(existing) = std::fs::read(path)
            && Sha256::digest(&existing) == Sha256::digest(rendered.as_bytes())
        {
            return Ok(false);
        }

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        std::fs::write(path, rendered.as_bytes()).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(true)
    }

    fn load_str_merged<S: Schema>(&self, text: &str, defaults: &S) -> Result<S, ConfigError> {
        let tree: Table = toml::from_str(text)?;
        let mut config = S::default();
        marshal::populate(&mut config, &tree)?;
        merge::merge_instances(&mut config, defaults);
        Ok(config)
    }
}

impl Default for TomlProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}
