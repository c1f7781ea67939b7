use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::{error, info, warn};
use serde::Deserialize;

use crate::config::DashboardConfig;
use crate::error::DashboardError;

const BUILTIN_CATALOG: &str = include_str!("../../assets/mitre_techniques.toml");
const REFERENCE_BASE: &str = "https://attack.mitre.org/techniques/";

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    techniques: HashMap<String, String>,
}

/// Lookup from MITRE ATT&CK technique code to display name.
#[derive(Debug, Clone, Default)]
pub struct TechniqueCatalog {
    names: HashMap<String, String>,
}

impl TechniqueCatalog {
    pub fn builtin() -> Self {
        Self::from_toml_str(BUILTIN_CATALOG).unwrap_or_else(|e| {
            error!("Built-in technique catalog is invalid: {}", e);
            Self::default()
        })
    }

    pub fn from_toml_str(text: &str) -> Result<Self, DashboardError> {
        let file: CatalogFile = toml::from_str(text)?;
        Ok(Self { names: file.techniques })
    }

    pub fn from_file(path: &Path) -> Result<Self, DashboardError> {
        let text = fs::read_to_string(path)?;
        let catalog = Self::from_toml_str(&text)?;
        info!(
            "Loaded {} technique names from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// The configured catalog file if one is set, the built-in table otherwise.
    pub fn load(config: &DashboardConfig) -> Result<Self, DashboardError> {
        let catalog = match &config.technique_catalog {
            Some(path) => Self::from_file(path)?,
            None => Self::builtin(),
        };
        if catalog.is_empty() {
            warn!("Technique catalog is empty; techniques will show by code only");
        }
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Unknown codes display as themselves.
    pub fn display_name<'a>(&'a self, code: &'a str) -> &'a str {
        self.names.get(code).map(String::as_str).unwrap_or(code)
    }

    /// Sub-techniques live one path level down: `T1059.004` → `T1059/004/`.
    pub fn reference_url(code: &str) -> String {
        format!("{}{}/", REFERENCE_BASE, code.replacen('.', "/", 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_builtin_names() {
        let catalog = TechniqueCatalog::builtin();
        assert_eq!(catalog.len(), 10);
        assert_eq!(catalog.display_name("T1486"), "Data Encrypted for Impact");
        assert_eq!(
            catalog.display_name("T1110.001"),
            "Brute Force: Password Guessing"
        );
    }

    #[test]
    fn test_unknown_code_falls_back_to_code() {
        let catalog = TechniqueCatalog::builtin();
        assert_eq!(catalog.display_name("T9999"), "T9999");
    }

    #[test]
    fn test_reference_url() {
        assert_eq!(
            TechniqueCatalog::reference_url("T1059.004"),
            "https://attack.mitre.org/techniques/T1059/004/"
        );
        assert_eq!(
            TechniqueCatalog::reference_url("T1486"),
            "https://attack.mitre.org/techniques/T1486/"
        );
    }

    #[test]
    fn test_catalog_file_replaces_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("techniques.toml");
        fs::write(&path, "[techniques]\n\"T9999\" = \"Made Up Technique\"\n").unwrap();

        let catalog = TechniqueCatalog::load(&DashboardConfig {
            technique_catalog: Some(path),
        })
        .unwrap();
        assert_eq!(catalog.display_name("T9999"), "Made Up Technique");
        assert_eq!(catalog.display_name("T1486"), "T1486");
    }

    #[test]
    fn test_missing_catalog_file_is_an_error() {
        let result = TechniqueCatalog::load(&DashboardConfig {
            technique_catalog: Some(PathBuf::from("/nonexistent/techniques.toml")),
        });
        assert!(matches!(result, Err(DashboardError::IoError(_))));
    }

    #[test]
    fn test_malformed_catalog_is_an_error() {
        assert!(matches!(
            TechniqueCatalog::from_toml_str("[techniques\n"),
            Err(DashboardError::CatalogError(_))
        ));
    }
}
