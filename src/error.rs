use camino::Utf8PathBuf;
use miette::Diagnostic;

/// Everything that can stop a run.
///
/// Every variant is fatal; `main` reports it once and exits with status 1.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum Error {
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: Utf8PathBuf },

    #[error("Failed to parse configuration file {path}")]
    ConfigParse {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration file is missing the `{key}` key: {path}")]
    ConfigMissingKey { path: Utf8PathBuf, key: &'static str },

    #[error("`{key}` does not exist: {path}")]
    ConfigPathInvalid { key: &'static str, path: Utf8PathBuf },

    #[error("Could not find `dot` in Graphviz installation {path}")]
    #[diagnostic(help("Set `graphviz_path` to the `dot` executable or the directory containing it"))]
    GraphvizNotFound { path: Utf8PathBuf },

    #[error("Failed to read commit history: {stderr}")]
    #[diagnostic(help("Is {repository} a Git repository?"))]
    HistoryQuery {
        repository: Utf8PathBuf,
        stderr: String,
    },

    #[error("Malformed `git log` line: {line:?}")]
    MalformedLogLine { line: String },

    #[error("Graphviz did not write the graph image: {path}")]
    RenderOutputMissing { path: Utf8PathBuf },

    #[error("Failed to open {path} in an image viewer")]
    ViewerLaunch {
        path: Utf8PathBuf,
        #[source]
        source: command_error::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Command(#[from] command_error::Error),
}
