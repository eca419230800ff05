use std::process::Command;

use camino::Utf8Path;

use super::Git;
use super::GitLog;

pub trait GitLike: Sized {
    type CurrentDir: AsRef<Utf8Path>;

    fn as_git(&self) -> &Git<Self::CurrentDir>;

    #[inline]
    fn get_current_dir(&self) -> &Self::CurrentDir {
        self.as_git().get_current_dir()
    }

    /// Get a `git` command.
    #[inline]
    fn command(&self) -> Command {
        self.as_git().command()
    }

    /// Methods for reading commit history.
    #[inline]
    fn log(&self) -> GitLog<'_, Self> {
        GitLog::new(self)
    }
}
