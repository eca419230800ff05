use std::process::Command;

use camino::Utf8Path;
use command_error::CommandExt;
use tracing::instrument;

use crate::error::Error;

/// Something that can show an image to the user.
pub trait Viewer {
    fn open(&self, path: &Utf8Path) -> miette::Result<()>;
}

/// Opens files with the operating system's default application.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemViewer;

impl SystemViewer {
    /// The command which opens `path` on this platform.
    pub fn command(path: &Utf8Path) -> Command {
        if cfg!(windows) {
            let mut command = Command::new("cmd");
            // The empty argument is `start`'s window title.
            command.args(["/C", "start", ""]).arg(path);
            command
        } else if cfg!(target_os = "macos") {
            let mut command = Command::new("open");
            command.arg(path);
            command
        } else {
            let mut command = Command::new("xdg-open");
            command.arg(path);
            command
        }
    }

    /// Run a viewer `command` for `path`, failing if it can't start or exits non-zero.
    fn launch(mut command: Command, path: &Utf8Path) -> Result<(), Error> {
        command
            .status_checked()
            .map_err(|source| Error::ViewerLaunch {
                path: path.to_owned(),
                source,
            })?;
        Ok(())
    }
}

impl Viewer for SystemViewer {
    #[instrument(level = "trace")]
    fn open(&self, path: &Utf8Path) -> miette::Result<()> {
        Ok(Self::launch(Self::command(path), path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command() {
        let command = SystemViewer::command(Utf8Path::new("commit_dependency_graph.png"));
        let args: Vec<_> = command.get_args().collect();

        assert_eq!(
            args.last().and_then(|arg| arg.to_str()),
            Some("commit_dependency_graph.png")
        );

        if cfg!(windows) {
            assert_eq!(command.get_program(), "cmd");
        } else if cfg!(target_os = "macos") {
            assert_eq!(command.get_program(), "open");
        } else {
            assert_eq!(command.get_program(), "xdg-open");
        }
    }

    #[test]
    fn test_launch_missing_program() {
        let path = Utf8Path::new("commit_dependency_graph.png");
        let err = SystemViewer::launch(Command::new("git-depgraph-no-such-viewer"), path)
            .unwrap_err();

        assert!(
            matches!(&err, Error::ViewerLaunch { path: failed, .. } if failed == path),
            "{err:?}"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_launch_nonzero_exit() {
        let path = Utf8Path::new("commit_dependency_graph.png");
        let err = SystemViewer::launch(Command::new("false"), path).unwrap_err();

        assert!(matches!(err, Error::ViewerLaunch { .. }), "{err:?}");
    }
}
