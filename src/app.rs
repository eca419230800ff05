use calm_io::stdoutln;
use camino::Utf8PathBuf;
use miette::IntoDiagnostic;

use crate::config::Config;
use crate::git::Git;
use crate::graph::DependencyGraph;
use crate::render::Graphviz;
use crate::render::Renderer;
use crate::viewer::SystemViewer;
use crate::viewer::Viewer;

pub struct App {
    config: Config,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn run(self) -> miette::Result<()> {
        let renderer = Graphviz::from_installation(&self.config.file.graphviz_path)?;
        self.run_with(&renderer, &SystemViewer)?;
        Ok(())
    }

    /// Read the repository's history, render it, and show it.
    ///
    /// Returns the image path, or `None` if the repository has no commits.
    pub fn run_with(
        &self,
        renderer: &impl Renderer,
        viewer: &impl Viewer,
    ) -> miette::Result<Option<Utf8PathBuf>> {
        let repository = &self.config.file.repository_path;
        let commits = Git::from_path(repository).commits()?;

        if commits.is_empty() {
            tracing::info!(%repository, "No commits to render");
            return Ok(None);
        }
        tracing::debug!(commits = commits.len(), "Read commit history");

        let graph = DependencyGraph::from_commits(&commits);
        let image = renderer.render(&graph, &self.config.cli.output)?;

        if self.config.cli.no_open {
            tracing::info!(%image, "Rendered commit graph");
        } else {
            viewer.open(&image)?;
            tracing::info!(%image, "Rendered and opened commit graph");
        }

        stdoutln!("{image}").into_diagnostic()?;
        Ok(Some(image))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::process::Command;

    use camino::Utf8Path;
    use clap::Parser;
    use command_error::CommandExt;
    use miette::miette;
    use pretty_assertions::assert_eq;

    use crate::cli::Cli;
    use crate::config::ConfigFile;
    use crate::error::Error;
    use crate::Utf8TempDir;

    use super::*;

    #[derive(Default)]
    struct RecordingRenderer {
        graphs: RefCell<Vec<DependencyGraph>>,
    }

    impl Renderer for RecordingRenderer {
        fn render(
            &self,
            graph: &DependencyGraph,
            output: &Utf8Path,
        ) -> miette::Result<Utf8PathBuf> {
            self.graphs.borrow_mut().push(graph.clone());
            Ok(output.to_owned())
        }
    }

    #[derive(Default)]
    struct RecordingViewer {
        opened: RefCell<Vec<Utf8PathBuf>>,
    }

    impl Viewer for RecordingViewer {
        fn open(&self, path: &Utf8Path) -> miette::Result<()> {
            self.opened.borrow_mut().push(path.to_owned());
            Ok(())
        }
    }

    struct BrokenViewer;

    impl Viewer for BrokenViewer {
        fn open(&self, _path: &Utf8Path) -> miette::Result<()> {
            Err(miette!("No display"))
        }
    }

    fn git(repository: &Utf8Path, args: &[&str]) {
        Command::new("git")
            .current_dir(repository)
            .env("GIT_CONFIG_NOSYSTEM", "1")
            .env("GIT_CONFIG_GLOBAL", "/dev/null")
            .args([
                "-c",
                "user.name=Puppy Doggy",
                "-c",
                "user.email=dog@becca.ooo",
                "-c",
                "init.defaultBranch=main",
            ])
            .args(args)
            .output_checked_utf8()
            .unwrap();
    }

    fn app(tempdir: &Utf8TempDir, extra_args: &[&str]) -> App {
        let repository = tempdir.join("repo");
        fs_err::create_dir(&repository).unwrap();
        git(&repository, &["init"]);

        let output = tempdir.join("graph.png");
        let cli = Cli::try_parse_from(
            ["git-depgraph", "config.json", "--output", output.as_str()]
                .iter()
                .chain(extra_args),
        )
        .unwrap();

        App::new(Config {
            file: ConfigFile {
                graphviz_path: tempdir.to_path_buf(),
                repository_path: repository,
            },
            cli,
        })
    }

    fn commit(app: &App, message: &str) {
        git(
            &app.config.file.repository_path,
            &["commit", "--allow-empty", "-m", message],
        );
    }

    #[test]
    fn test_empty_repository() {
        let tempdir = Utf8TempDir::new().unwrap();
        let app = app(&tempdir, &[]);
        let renderer = RecordingRenderer::default();
        let viewer = RecordingViewer::default();

        assert_eq!(app.run_with(&renderer, &viewer).unwrap(), None);
        assert!(renderer.graphs.borrow().is_empty());
        assert!(viewer.opened.borrow().is_empty());
    }

    #[test]
    fn test_renders_and_opens() {
        let tempdir = Utf8TempDir::new().unwrap();
        let app = app(&tempdir, &[]);
        commit(&app, "First");
        commit(&app, "Second");
        commit(&app, "Third");

        let renderer = RecordingRenderer::default();
        let viewer = RecordingViewer::default();
        let image = app.run_with(&renderer, &viewer).unwrap();

        assert_eq!(image, Some(tempdir.join("graph.png")));
        assert_eq!(*viewer.opened.borrow(), vec![tempdir.join("graph.png")]);

        let graphs = renderer.graphs.borrow();
        assert_eq!(graphs.len(), 1);
        assert_eq!(graphs[0].nodes().len(), 3);
        assert_eq!(graphs[0].edges().len(), 2);
        assert_eq!(graphs[0].dangling_parents().count(), 0);
        assert!(graphs[0].nodes()[0].label.contains("HEAD -> main"));
    }

    #[test]
    fn test_no_open() {
        let tempdir = Utf8TempDir::new().unwrap();
        let app = app(&tempdir, &["--no-open"]);
        commit(&app, "First");

        let renderer = RecordingRenderer::default();
        let viewer = RecordingViewer::default();
        app.run_with(&renderer, &viewer).unwrap();

        assert_eq!(renderer.graphs.borrow().len(), 1);
        assert!(viewer.opened.borrow().is_empty());
    }

    #[test]
    fn test_viewer_failure_is_fatal() {
        let tempdir = Utf8TempDir::new().unwrap();
        let app = app(&tempdir, &[]);
        commit(&app, "First");

        assert!(app
            .run_with(&RecordingRenderer::default(), &BrokenViewer)
            .is_err());
    }

    #[test]
    fn test_not_a_repository() {
        let tempdir = Utf8TempDir::new().unwrap();
        let mut app = app(&tempdir, &[]);
        app.config.file.repository_path = tempdir.join("not-a-repo");
        fs_err::create_dir(&app.config.file.repository_path).unwrap();

        let err = app
            .run_with(&RecordingRenderer::default(), &RecordingViewer::default())
            .unwrap_err();
        assert!(
            matches!(
                err.downcast_ref::<Error>(),
                Some(Error::HistoryQuery { stderr, .. }) if stderr.contains("not a git repository")
            ),
            "{err:?}"
        );
    }
}
