//! Layered settings: defaults, then an optional TOML file, then flags and
//! environment.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use transit_core::PipelineConfig;
use transit_graph::GraphConfig;

/// Contents of a `transit.toml`.
///
/// ```toml
/// [graph]
/// uri = "bolt://localhost:7687"
/// password = "secret"
///
/// [pipeline]
/// data_dir = "data"
/// error_policy = "halt"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub graph: GraphConfig,
    pub pipeline: PipelineConfig,
}

/// Values given on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub uri: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
    pub data_dir: Option<PathBuf>,
}

impl Settings {
    /// Load from `path`, or defaults when no file is given. Relative data
    /// paths in the file are taken relative to the file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut settings: Settings = toml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        if let Some(base) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            settings.pipeline.rebase(base);
        }
        Ok(settings)
    }

    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(uri) = overrides.uri {
            self.graph.uri = uri;
        }
        if let Some(user) = overrides.user {
            self.graph.user = user;
        }
        if let Some(password) = overrides.password {
            self.graph.password = password;
        }
        if let Some(database) = overrides.database {
            self.graph.database = database;
        }
        if let Some(data_dir) = overrides.data_dir {
            self.pipeline.data_dir = data_dir;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use transit_core::ErrorPolicy;

    #[test]
    fn test_defaults_without_file() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.graph.uri, "bolt://localhost:7687");
        assert_eq!(settings.pipeline.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn test_file_values_and_rebase() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transit.toml");
        std::fs::write(
            &path,
            r#"
[graph]
uri = "bolt://graph:7687"

[pipeline]
data_dir = "csv"
error_policy = "halt"
top_n = 3
"#,
        )
        .unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.graph.uri, "bolt://graph:7687");
        assert_eq!(settings.graph.user, "neo4j");
        assert_eq!(settings.pipeline.data_dir, dir.path().join("csv"));
        assert_eq!(settings.pipeline.error_policy, ErrorPolicy::Halt);
        assert_eq!(settings.pipeline.top_n, 3);
        assert_eq!(settings.pipeline.degree_limit, 20);
    }

    #[test]
    fn test_bad_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transit.toml");
        std::fs::write(&path, "[pipeline]\ntop_n = \"many\"\n").unwrap();
        assert!(Settings::load(Some(&path)).is_err());
        assert!(Settings::load(Some(&dir.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn test_overrides_win() {
        let mut settings = Settings::default();
        settings.apply(Overrides {
            uri: Some("bolt://other:7687".to_string()),
            password: Some("secret".to_string()),
            data_dir: Some(PathBuf::from("/srv/data")),
            ..Overrides::default()
        });
        assert_eq!(settings.graph.uri, "bolt://other:7687");
        assert_eq!(settings.graph.password, "secret");
        assert_eq!(settings.graph.user, "neo4j");
        assert_eq!(settings.pipeline.data_dir, PathBuf::from("/srv/data"));
    }
}
