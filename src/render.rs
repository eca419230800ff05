//! Drawing a [`DependencyGraph`] to an image file.

use std::process::Command;

use camino::Utf8Path;
use camino::Utf8PathBuf;
use command_error::CommandExt;
use miette::IntoDiagnostic;
use tracing::instrument;

use crate::error::Error;
use crate::fs;
use crate::graph::DependencyGraph;
use crate::Utf8TempDir;

/// Image format used when the output path has no extension.
pub const DEFAULT_FORMAT: &str = "png";

/// Something that can draw a [`DependencyGraph`].
pub trait Renderer {
    /// Draw `graph` to `output`, overwriting it, and return the path of the written image.
    fn render(&self, graph: &DependencyGraph, output: &Utf8Path) -> miette::Result<Utf8PathBuf>;
}

/// Renders graphs with Graphviz's `dot`.
#[derive(Debug, Clone)]
pub struct Graphviz {
    dot: Utf8PathBuf,
}

impl Graphviz {
    pub fn new(dot: Utf8PathBuf) -> Self {
        Self { dot }
    }

    /// Find `dot` given either the executable itself or a Graphviz installation directory.
    ///
    /// Directories are searched directly and in their `bin` subdirectory.
    #[instrument(level = "trace")]
    pub fn from_installation(path: &Utf8Path) -> miette::Result<Self> {
        if path.is_file() {
            return Ok(Self::new(path.to_owned()));
        }

        let search_path = std::env::join_paths([path.to_owned(), path.join("bin")]).map_err(
            |_err| Error::GraphvizNotFound {
                path: path.to_owned(),
            },
        )?;
        let dot = which::which_in("dot", Some(search_path), path).map_err(|_err| {
            Error::GraphvizNotFound {
                path: path.to_owned(),
            }
        })?;
        let dot = Utf8PathBuf::try_from(dot).into_diagnostic()?;

        tracing::debug!(%dot, "Found Graphviz");
        Ok(Self::new(dot))
    }

    pub fn dot(&self) -> &Utf8Path {
        &self.dot
    }
}

impl Renderer for Graphviz {
    #[instrument(level = "trace", skip(graph))]
    fn render(&self, graph: &DependencyGraph, output: &Utf8Path) -> miette::Result<Utf8PathBuf> {
        let tempdir = Utf8TempDir::new()?;
        let source = tempdir.join("commit_dependency_graph.gv");
        fs::write(&source, graph.to_string())?;

        // Otherwise a stale image would hide a render that wrote nothing.
        if output.exists() {
            fs::remove_file(output)?;
        }

        let format = output.extension().unwrap_or(DEFAULT_FORMAT);
        Command::new(self.dot())
            .arg(format!("-T{format}"))
            .arg("-o")
            .arg(output)
            .arg(&source)
            .output_checked_utf8()?;

        if !output.exists() {
            return Err(Error::RenderOutputMissing {
                path: output.to_owned(),
            }
            .into());
        }

        tracing::debug!(%output, "Rendered graph");
        Ok(output.to_owned())
    }
}
