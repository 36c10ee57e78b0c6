use crate::core::ConfigStore;
use crate::utils::error::{Result, ShopError};
use std::fs;
use std::path::{Path, PathBuf};

/// TOML data file holding the `prices` and `min-amounts` sections.
///
/// Keys outside those sections are kept as they were read.
#[derive(Debug, Clone)]
pub struct TomlFileStore {
    path: PathBuf,
    document: toml::Table,
}

impl TomlFileStore {
    /// Opens `path`, writing a default document first if the file is missing.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            tracing::info!("📁 Creating default data file at {}", path.display());
            let mut store = Self {
                path,
                document: default_document(),
            };
            store.persist()?;
            return Ok(store);
        }

        let content = fs::read_to_string(&path)?;
        let document = toml::from_str::<toml::Table>(&content).map_err(|e| {
            ShopError::ConfigValidation {
                field: path.display().to_string(),
                message: format!("TOML parsing error: {}", e),
            }
        })?;

        Ok(Self { path, document })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &toml::Table {
        &self.document
    }

    fn persistence_error(&self, message: impl ToString) -> ShopError {
        ShopError::Persistence {
            path: self.path.display().to_string(),
            message: message.to_string(),
        }
    }
}

impl ConfigStore for TomlFileStore {
    fn section(&self, name: &str) -> Option<&toml::Table> {
        self.document.get(name).and_then(|value| value.as_table())
    }

    fn replace_section(&mut self, name: &str, section: toml::Table) {
        self.document
            .insert(name.to_string(), toml::Value::Table(section));
    }

    fn persist(&mut self) -> Result<()> {
        let content =
            toml::to_string_pretty(&self.document).map_err(|e| self.persistence_error(e))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.persistence_error(e))?;
            }
        }

        fs::write(&self.path, content).map_err(|e| self.persistence_error(e))?;
        tracing::debug!("Data file written to {}", self.path.display());
        Ok(())
    }
}

pub(crate) fn default_document() -> toml::Table {
    let mut document = toml::Table::new();
    document.insert(
        crate::core::ledger::PRICES_SECTION.to_string(),
        toml::Value::Table(toml::Table::new()),
    );
    document.insert(
        crate::core::ledger::MIN_AMOUNTS_SECTION.to_string(),
        toml::Value::Table(toml::Table::new()),
    );
    document
}
