use crate::error::{CliError, Result};
use ffserial::forces::torch::GlobalParameter;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileDocumentConfig {
    #[serde(rename = "root-name")]
    pub root_name: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileForceConfig {
    #[serde(rename = "force-group")]
    pub force_group: Option<i64>,
    #[serde(rename = "uses-periodic")]
    pub uses_periodic: Option<bool>,
    #[serde(rename = "outputs-forces")]
    pub outputs_forces: Option<bool>,
    #[serde(rename = "global-parameters", default)]
    pub global_parameters: Vec<GlobalParameter>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub document: Option<FileDocumentConfig>,
    pub force: Option<FileForceConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn full_config_file_is_parsed() {
        let config: FileConfig = toml::from_str(
            r#"
            [document]
            root-name = "System"

            [force]
            force-group = 4
            uses-periodic = true
            outputs-forces = false
            global-parameters = [
                { name = "k", default = 1.5 },
                { name = "r0", default = 0.2 },
            ]
            "#,
        )
        .unwrap();

        assert_eq!(config.document.unwrap().root_name.as_deref(), Some("System"));
        let force = config.force.unwrap();
        assert_eq!(force.force_group, Some(4));
        assert_eq!(force.uses_periodic, Some(true));
        assert_eq!(force.outputs_forces, Some(false));
        assert_eq!(force.global_parameters.len(), 2);
        assert_eq!(force.global_parameters[1].name, "r0");
    }

    #[test]
    fn empty_config_file_yields_no_sections() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: std::result::Result<FileConfig, _> =
            toml::from_str("[force]\nforce_group = 2\n");
        assert!(result.is_err());
    }

    #[test]
    fn from_file_reports_the_offending_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[document]\nroot-name = 3\n").unwrap();

        match FileConfig::from_file(&path) {
            Err(CliError::FileParsing { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("Expected a file parsing error, got {:?}", other),
        }
    }

    #[test]
    fn from_file_propagates_missing_files_as_io_errors() {
        let dir = tempdir().unwrap();
        let result = FileConfig::from_file(&dir.path().join("missing.toml"));
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
