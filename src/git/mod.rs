use std::fmt::Debug;
use std::process::Command;

use camino::Utf8Path;

use crate::error::Error;

mod commit_hash;
mod git_like;
mod log;

pub use commit_hash::CommitHash;
pub use git_like::GitLike;
pub use log::CommitRecord;
pub use log::GitLog;
pub use log::LOG_FORMAT;

/// `git` CLI wrapper.
#[derive(Clone)]
pub struct Git<C> {
    current_dir: C,
    env_variables: Vec<(String, String)>,
}

impl<C> Debug for Git<C>
where
    C: AsRef<Utf8Path>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Git")
            .field(&self.current_dir.as_ref())
            .finish()
    }
}

impl<C> AsRef<Utf8Path> for Git<C>
where
    C: AsRef<Utf8Path>,
{
    fn as_ref(&self) -> &Utf8Path {
        self.current_dir.as_ref()
    }
}

impl<C> GitLike for Git<C>
where
    C: AsRef<Utf8Path>,
{
    type CurrentDir = C;

    fn as_git(&self) -> &Git<Self::CurrentDir> {
        self
    }

    fn get_current_dir(&self) -> &Self::CurrentDir {
        &self.current_dir
    }
}

impl<C> Git<C>
where
    C: AsRef<Utf8Path>,
{
    pub fn from_path(current_dir: C) -> Self {
        Self {
            current_dir,
            env_variables: Vec::new(),
        }
    }

    /// Get a `git` command.
    pub fn command(&self) -> Command {
        let mut command = Command::new("git");
        command.current_dir(self.current_dir.as_ref());
        command.envs(self.env_variables.iter().map(|(key, value)| (key, value)));
        command
    }

    pub fn envs(&mut self, iter: impl IntoIterator<Item = (String, String)>) {
        self.env_variables.extend(iter);
    }

    /// Read this repository's commit history.
    pub fn commits(&self) -> Result<Vec<CommitRecord>, Error> {
        self.log().all_commits()
    }
}
