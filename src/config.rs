use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CleanerConfig – all cleaning policy, passed into the pipeline explicitly
// ---------------------------------------------------------------------------

/// Configuration for one cleaning pipeline. Nothing here is process-global:
/// two pipelines with different mappings or output locations can coexist,
/// and tests construct throwaway configs freely.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    /// Lowercased extensions the shell accepts.
    pub allowed_extensions: Vec<String>,
    /// Known raw header → standardized header. Headers not in the map pass
    /// through verbatim.
    pub header_mapping: BTreeMap<String, String>,
    /// Textual tokens that mean "no data" despite not being empty cells.
    pub sentinel_values: Vec<String>,
    /// Directory the cleaned workbook is written into (created if absent).
    pub output_dir: PathBuf,
    /// Workbook filename inside `output_dir`. Fixed per config, so repeated
    /// runs overwrite the previous artifact.
    pub output_filename: String,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        let header_mapping = [
            ("Sample_ID", "Sample ID"),
            ("Test_Date", "Test Date"),
            ("Temp (°C)", "Temperature (°C)"),
            ("Result_Value", "Result Value"),
        ]
        .into_iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect();

        CleanerConfig {
            allowed_extensions: vec!["csv".into(), "xlsx".into(), "xlsm".into()],
            header_mapping,
            sentinel_values: vec!["N/A".into(), "NA".into(), "<0.3".into()],
            output_dir: PathBuf::from("outputs"),
            output_filename: "cleaned_data.xlsx".into(),
        }
    }
}

impl CleanerConfig {
    /// Load a config from a JSON file. Missing fields fall back to the
    /// defaults, so a file may override just the header mapping.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: CleanerConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }

    /// Whether the shell should accept a file with this path's extension.
    pub fn is_allowed(&self, path: &Path) -> bool {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => {
                let ext = ext.to_ascii_lowercase();
                self.allowed_extensions.iter().any(|a| a == &ext)
            }
            None => false,
        }
    }

    /// Where the cleaned workbook lands.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_filename)
    }

    /// Point this config's artifact at an explicit path. Callers that run
    /// several cleanings concurrently give each run its own path here.
    pub fn set_output_path(&mut self, path: PathBuf) {
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            self.output_filename = name.to_string();
        }
        self.output_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mirrors_known_lab_headers() {
        let config = CleanerConfig::default();
        assert_eq!(
            config.header_mapping.get("Temp (°C)").map(String::as_str),
            Some("Temperature (°C)")
        );
        assert!(config.sentinel_values.contains(&"<0.3".to_string()));
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        let config = CleanerConfig::default();
        assert!(config.is_allowed(Path::new("data/Run1.CSV")));
        assert!(config.is_allowed(Path::new("lab.xlsm")));
        assert!(!config.is_allowed(Path::new("notes.txt")));
        assert!(!config.is_allowed(Path::new("no_extension")));
    }

    #[test]
    fn partial_json_overrides_keep_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "sentinel_values": ["-999"] }"#).unwrap();

        let config = CleanerConfig::from_json_file(&path).unwrap();
        assert_eq!(config.sentinel_values, vec!["-999".to_string()]);
        assert_eq!(config.output_filename, "cleaned_data.xlsx");
    }

    #[test]
    fn output_override_splits_dir_and_name() {
        let mut config = CleanerConfig::default();
        config.set_output_path(PathBuf::from("runs/42/result.xlsx"));
        assert_eq!(config.output_path(), PathBuf::from("runs/42/result.xlsx"));

        config.set_output_path(PathBuf::from("bare.xlsx"));
        assert_eq!(config.output_path(), PathBuf::from("./bare.xlsx"));
    }
}
