use camino::Utf8Path;
use camino::Utf8PathBuf;
use clap::Parser;
use serde::Deserialize;

use crate::cli::Cli;
use crate::error::Error;
use crate::fs;
use crate::install_tracing::install_tracing;

/// Configuration, both from the command-line and the JSON configuration file.
#[derive(Debug)]
pub struct Config {
    /// Configuration file.
    pub file: ConfigFile,
    /// Command-line options.
    pub cli: Cli,
}

impl Config {
    pub fn new() -> miette::Result<Self> {
        let cli = Cli::parse();
        install_tracing(&cli.log)?;
        Self::from_cli(cli)
    }

    /// Load the configuration file named on the command line.
    pub fn from_cli(cli: Cli) -> miette::Result<Self> {
        let file = ConfigFile::from_path(&cli.config)?;
        Ok(Self { file, cli })
    }
}

/// Configuration file format.
///
/// Both paths are checked for existence when the file is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    /// The `dot` executable, or the Graphviz installation directory containing it.
    pub graphviz_path: Utf8PathBuf,
    /// The Git repository to read history from.
    pub repository_path: Utf8PathBuf,
}

/// [`ConfigFile`] before required keys are checked.
#[derive(Debug, Default, Deserialize)]
struct RawConfigFile {
    #[serde(default)]
    graphviz_path: Option<Utf8PathBuf>,

    #[serde(default)]
    repository_path: Option<Utf8PathBuf>,
}

impl ConfigFile {
    #[tracing::instrument(level = "trace")]
    pub fn from_path(path: &Utf8Path) -> miette::Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound {
                path: path.to_owned(),
            }
            .into());
        }

        Ok(Self::from_json(path, &fs::read_to_string(path)?)?)
    }

    /// Parse and validate configuration file `contents`. `path` is used for error messages.
    pub fn from_json(path: &Utf8Path, contents: &str) -> Result<Self, Error> {
        let raw: RawConfigFile =
            serde_json::from_str(contents).map_err(|source| Error::ConfigParse {
                path: path.to_owned(),
                source,
            })?;

        let missing_key = |key| Error::ConfigMissingKey {
            path: path.to_owned(),
            key,
        };
        let graphviz_path = raw.graphviz_path.ok_or_else(|| missing_key("graphviz_path"))?;
        let repository_path = raw
            .repository_path
            .ok_or_else(|| missing_key("repository_path"))?;

        for (key, value) in [
            ("graphviz_path", &graphviz_path),
            ("repository_path", &repository_path),
        ] {
            if !value.exists() {
                return Err(Error::ConfigPathInvalid {
                    key,
                    path: value.clone(),
                });
            }
        }

        tracing::debug!(%graphviz_path, %repository_path, "Loaded configuration");

        Ok(Self {
            graphviz_path,
            repository_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::Utf8TempDir;

    use super::*;

    fn config_json(graphviz_path: &Utf8Path, repository_path: &Utf8Path) -> String {
        serde_json::json!({
            "graphviz_path": graphviz_path,
            "repository_path": repository_path,
        })
        .to_string()
    }

    #[test]
    fn test_config_file_valid() {
        let tempdir = Utf8TempDir::new().unwrap();
        let config_path = tempdir.join("config.json");
        fs::write(&config_path, config_json(&tempdir, &tempdir)).unwrap();

        assert_eq!(
            ConfigFile::from_path(&config_path).unwrap(),
            ConfigFile {
                graphviz_path: tempdir.to_path_buf(),
                repository_path: tempdir.to_path_buf(),
            }
        );
    }

    #[test]
    fn test_config_file_extra_keys() {
        let tempdir = Utf8TempDir::new().unwrap();
        let contents = serde_json::json!({
            "graphviz_path": tempdir.as_str(),
            "repository_path": tempdir.as_str(),
            "output": "graph.png",
        })
        .to_string();

        assert!(ConfigFile::from_json(&tempdir.join("config.json"), &contents).is_ok());
    }

    #[test]
    fn test_config_file_not_found() {
        let tempdir = Utf8TempDir::new().unwrap();
        let err = ConfigFile::from_path(&tempdir.join("config.json")).unwrap_err();

        assert!(
            matches!(err.downcast_ref::<Error>(), Some(Error::ConfigNotFound { .. })),
            "{err:?}"
        );
    }

    #[test]
    fn test_config_file_parse_error() {
        let err = ConfigFile::from_json(Utf8Path::new("config.json"), "{ not json").unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }), "{err:?}");

        let err = ConfigFile::from_json(Utf8Path::new("config.json"), "42").unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }), "{err:?}");
    }

    #[test]
    fn test_config_file_missing_key() {
        let tempdir = Utf8TempDir::new().unwrap();

        let err = ConfigFile::from_json(
            Utf8Path::new("config.json"),
            &serde_json::json!({ "repository_path": tempdir.as_str() }).to_string(),
        )
        .unwrap_err();
        assert!(
            matches!(err, Error::ConfigMissingKey { key: "graphviz_path", .. }),
            "{err:?}"
        );

        let err = ConfigFile::from_json(
            Utf8Path::new("config.json"),
            &serde_json::json!({ "graphviz_path": tempdir.as_str() }).to_string(),
        )
        .unwrap_err();
        assert!(
            matches!(err, Error::ConfigMissingKey { key: "repository_path", .. }),
            "{err:?}"
        );
    }

    #[test]
    fn test_config_file_path_invalid() {
        let tempdir = Utf8TempDir::new().unwrap();
        let missing = tempdir.join("does-not-exist");

        let err = ConfigFile::from_json(
            Utf8Path::new("config.json"),
            &config_json(&missing, &tempdir),
        )
        .unwrap_err();
        assert!(
            matches!(err, Error::ConfigPathInvalid { key: "graphviz_path", .. }),
            "{err:?}"
        );

        let err = ConfigFile::from_json(
            Utf8Path::new("config.json"),
            &config_json(&tempdir, &missing),
        )
        .unwrap_err();
        assert!(
            matches!(err, Error::ConfigPathInvalid { key: "repository_path", ref path } if *path == missing),
            "{err:?}"
        );
    }
}
