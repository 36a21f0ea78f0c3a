//! Pipeline configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::category::{Category, DEFAULT_COUNTRY};
use crate::error::{TransitError, TransitResult};

/// What the pipeline does after a step fails or only partially succeeds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Log the failure and run the remaining steps.
    #[default]
    Continue,
    /// Stop at the first failed or partial step.
    Halt,
}

/// Configuration of one import + analytics run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub data_dir: PathBuf,
    pub dart_file: Option<PathBuf>,
    pub luas_file: Option<PathBuf>,
    pub bus_file: Option<PathBuf>,
    /// Encoding label of the CSV files: a Latin-1 alias or a WHATWG label.
    pub encoding: String,
    pub country: String,
    pub error_policy: ErrorPolicy,
    pub projection: String,
    pub start_station: String,
    pub end_station: String,
    pub top_n: usize,
    pub degree_limit: usize,
    pub sample_limit: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            dart_file: None,
            luas_file: None,
            bus_file: None,
            encoding: "latin1".to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            error_policy: ErrorPolicy::Continue,
            projection: "luasGraph".to_string(),
            start_station: "Tallaght".to_string(),
            end_station: "Heuston".to_string(),
            top_n: 5,
            degree_limit: 20,
            sample_limit: 10,
        }
    }
}

impl PipelineConfig {
    /// CSV path of a category: the explicit override, else `data_dir/<default name>`.
    pub fn dataset_path(&self, category: Category) -> PathBuf {
        let explicit = match category {
            Category::Dart => self.dart_file.as_ref(),
            Category::Luas => self.luas_file.as_ref(),
            Category::Bus => self.bus_file.as_ref(),
        };
        explicit
            .cloned()
            .unwrap_or_else(|| self.data_dir.join(category.default_file_name()))
    }

    /// Make relative paths relative to `base`.
    pub fn rebase(&mut self, base: &Path) {
        let rebase = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        rebase(&mut self.data_dir);
        for file in [&mut self.dart_file, &mut self.luas_file, &mut self.bus_file]
            .into_iter()
            .flatten()
        {
            rebase(file);
        }
    }

    /// Parse a standalone pipeline TOML document and validate it.
    pub fn from_toml(text: &str) -> TransitResult<Self> {
        let config: PipelineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> TransitResult<()> {
        if self.country.trim().is_empty() {
            return Err(TransitError::config("country name must not be empty"));
        }
        if self.projection.trim().is_empty() {
            return Err(TransitError::config("projection name must not be empty"));
        }
        crate::dataset::resolve_encoding(&self.encoding)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let config = PipelineConfig::default();
        assert_eq!(
            config.dataset_path(Category::Luas),
            PathBuf::from("data").join("LUAS_Dataset.csv")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_explicit_path_wins() {
        let config = PipelineConfig {
            bus_file: Some(PathBuf::from("/tmp/routes.csv")),
            ..Default::default()
        };
        assert_eq!(config.dataset_path(Category::Bus), PathBuf::from("/tmp/routes.csv"));
        assert_eq!(
            config.dataset_path(Category::Dart),
            PathBuf::from("data").join("DART_Dataset.csv")
        );
    }

    #[test]
    fn test_partial_toml() {
        let config = PipelineConfig::from_toml(
            r#"
            data_dir = "datasets"
            error_policy = "halt"
            top_n = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("datasets"));
        assert_eq!(config.error_policy, ErrorPolicy::Halt);
        assert_eq!(config.top_n, 3);
        assert_eq!(config.encoding, "latin1");
        assert_eq!(config.projection, "luasGraph");
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(
            PipelineConfig::from_toml("top_n = \"five\""),
            Err(TransitError::Toml(_))
        ));
        assert!(matches!(
            PipelineConfig::from_toml("encoding = \"klingon\""),
            Err(TransitError::UnknownEncoding(_))
        ));
    }

    #[test]
    fn test_rebase_relative_only() {
        let mut config = PipelineConfig {
            dart_file: Some(PathBuf::from("/abs/dart.csv")),
            luas_file: Some(PathBuf::from("rel/luas.csv")),
            ..Default::default()
        };
        config.rebase(Path::new("/project"));
        assert_eq!(config.data_dir, PathBuf::from("/project/data"));
        assert_eq!(config.dart_file, Some(PathBuf::from("/abs/dart.csv")));
        assert_eq!(config.luas_file, Some(PathBuf::from("/project/rel/luas.csv")));
    }

    #[test]
    fn test_bad_encoding_rejected() {
        let config = PipelineConfig {
            encoding: "ebcdic-klingon".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(TransitError::UnknownEncoding(_))));
    }
}
