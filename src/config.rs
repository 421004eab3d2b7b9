use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::normalize::ZeroVariancePolicy;
use crate::data::time::TimeFormat;

/// Loader settings. Every field has a default, so a config file only needs
/// the keys it changes:
///
/// ```json
/// { "time_format": "24h", "zero_variance": "error", "data_dir": "/data/swim" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderConfig {
    /// Clock convention of the time column.
    pub time_format: TimeFormat,
    /// Handling of channels with zero variance during normalization.
    pub zero_variance: ZeroVariancePolicy,
    /// Base directory for relative input paths.
    pub data_dir: Option<PathBuf>,
}

impl LoaderConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Resolve an input path against `data_dir`. Absolute paths are kept.
    pub fn resolve_input(&self, file: &Path) -> PathBuf {
        match &self.data_dir {
            Some(dir) if file.is_relative() => dir.join(file),
            _ => file.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let cfg: LoaderConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, LoaderConfig::default());
        assert_eq!(cfg.time_format, TimeFormat::TwelveHour);
        assert_eq!(cfg.zero_variance, ZeroVariancePolicy::Zero);
    }

    #[test]
    fn reads_all_fields_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loader.json");
        std::fs::write(
            &path,
            r#"{ "time_format": "24h", "zero_variance": "nan", "data_dir": "/data/swim" }"#,
        )
        .unwrap();

        let cfg = LoaderConfig::from_json_file(&path).unwrap();
        assert_eq!(cfg.time_format, TimeFormat::TwentyFourHour);
        assert_eq!(cfg.zero_variance, ZeroVariancePolicy::Nan);
        assert_eq!(cfg.data_dir, Some(PathBuf::from("/data/swim")));
    }

    #[test]
    fn unknown_keys_and_values_are_rejected() {
        assert!(serde_json::from_str::<LoaderConfig>(r#"{ "chunk_len": 120 }"#).is_err());
        assert!(serde_json::from_str::<LoaderConfig>(r#"{ "time_format": "ampm" }"#).is_err());
    }

    #[test]
    fn relative_inputs_resolve_against_data_dir() {
        let cfg = LoaderConfig {
            data_dir: Some(PathBuf::from("/data/swim")),
            ..Default::default()
        };
        assert_eq!(
            cfg.resolve_input(Path::new("20181020_preliminary.xlsx")),
            PathBuf::from("/data/swim/20181020_preliminary.xlsx")
        );
        assert_eq!(
            cfg.resolve_input(Path::new("/tmp/a.xlsx")),
            PathBuf::from("/tmp/a.xlsx")
        );
        assert_eq!(
            LoaderConfig::default().resolve_input(Path::new("a.xlsx")),
            PathBuf::from("a.xlsx")
        );
    }
}
