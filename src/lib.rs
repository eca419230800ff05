//! `git-depgraph` renders a Git repository's commit graph with Graphviz.
//!
//! The `git-depgraph` Rust library is a convenience and shouldn't be depended on. It is not a
//! public/stable API and may change in minor version bumps.

mod app;
mod cli;
mod config;
mod error;
pub mod fs;
mod git;
mod graph;
mod install_tracing;
mod render;
mod utf8tempdir;
mod viewer;

pub use app::App;
pub use cli::Cli;
pub use config::Config;
pub use config::ConfigFile;
pub use error::Error;
pub use git::CommitHash;
pub use git::CommitRecord;
pub use git::Git;
pub use git::GitLike;
pub use git::GitLog;
pub use git::LOG_FORMAT;
pub use graph::DependencyGraph;
pub use graph::Edge;
pub use graph::Node;
pub use graph::NodeKind;
pub use render::Graphviz;
pub use render::Renderer;
pub use render::DEFAULT_FORMAT;
pub use utf8tempdir::Utf8TempDir;
pub use viewer::SystemViewer;
pub use viewer::Viewer;
