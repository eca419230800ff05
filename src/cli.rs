use camino::Utf8PathBuf;
use clap::Parser;

/// Render a Git repository's commit graph with Graphviz.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
#[command(max_term_width = 100)]
pub struct Cli {
    /// Log filter directives, of the form `target[span{field=value}]=level`, where all components
    /// except the level are optional.
    ///
    /// Try `debug` or `trace`.
    #[arg(long, default_value = "info", env = "GIT_DEPGRAPH_LOG")]
    pub log: String,

    /// JSON configuration file with `graphviz_path` and `repository_path` keys.
    pub config: Utf8PathBuf,

    /// Where to write the graph image. Overwritten if it exists.
    ///
    /// The image format is taken from the extension, e.g. `png` or `svg`.
    #[arg(long, short, default_value = "commit_dependency_graph.png")]
    pub output: Utf8PathBuf,

    /// Render the graph without opening it in an image viewer.
    #[arg(long)]
    pub no_open: bool,
}
