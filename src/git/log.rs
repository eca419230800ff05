use std::fmt::Debug;
use std::fmt::Display;

use camino::Utf8Path;
use command_error::CommandExt;
use command_error::OutputContext;
use itertools::Itertools;
use tracing::instrument;
use utf8_command::Utf8Output;
use winnow::combinator::opt;
use winnow::combinator::preceded;
use winnow::combinator::rest;
use winnow::token::take_till;
use winnow::PResult;
use winnow::Parser;

use crate::error::Error;

use super::CommitHash;
use super::GitLike;

/// `git log --pretty` format producing one [`CommitRecord`] per line.
///
/// Fields: full hash, space-separated parent hashes, short date, ref names.
pub const LOG_FORMAT: &str = "%H|%P|%ad|%D";

/// Git methods for reading commit history.
#[repr(transparent)]
pub struct GitLog<'a, G>(&'a G);

impl<G> Debug for GitLog<'_, G>
where
    G: GitLike,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("GitLog")
            .field(&self.0.get_current_dir().as_ref())
            .finish()
    }
}

impl<'a, G> GitLog<'a, G>
where
    G: GitLike,
{
    pub fn new(git: &'a G) -> Self {
        Self(git)
    }

    /// Every commit reachable from any ref, most recent first.
    ///
    /// A repository with no commits yields an empty list.
    #[instrument(level = "trace")]
    pub fn all_commits(&self) -> Result<Vec<CommitRecord>, Error> {
        let repository: &Utf8Path = self.0.get_current_dir().as_ref();
        self.0
            .command()
            .args(["log", "--all", "--date=short"])
            .arg(format!("--pretty=format:{LOG_FORMAT}"))
            .output_checked_as(|context: OutputContext<Utf8Output>| {
                if context.status().success() {
                    CommitRecord::parse_log(&context.output().stdout)
                } else {
                    Err(Error::HistoryQuery {
                        repository: repository.to_owned(),
                        stderr: context.output().stderr.trim().to_owned(),
                    })
                }
            })
    }
}

/// A single commit from `git log`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub hash: CommitHash,
    /// Direct parents. Empty for a root commit. These may name commits outside the current
    /// result set.
    pub parents: Vec<CommitHash>,
    /// Display-only commit date.
    pub date: String,
    /// Ref names pointing at this commit, as formatted by `git log`'s `%D`. Empty if none.
    pub refs: String,
}

impl CommitRecord {
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    /// Parse one line of [`LOG_FORMAT`] output.
    ///
    /// Only the hash is required; missing trailing fields are empty.
    pub fn parser(input: &mut &str) -> PResult<Self> {
        let hash = CommitHash::parser.parse_next(input)?;
        let parents = opt(preceded('|', take_till(0.., '|'))).parse_next(input)?;
        let date = opt(preceded('|', take_till(0.., '|'))).parse_next(input)?;
        let refs = opt(preceded('|', rest)).parse_next(input)?;

        Ok(Self {
            hash,
            parents: parents
                .unwrap_or_default()
                .split_whitespace()
                .map(CommitHash::from)
                .collect(),
            date: date.unwrap_or_default().to_owned(),
            refs: refs.unwrap_or_default().to_owned(),
        })
    }

    /// Parse the complete output of `git log --pretty=format:{LOG_FORMAT}`.
    ///
    /// Blank lines are skipped.
    pub fn parse_log(output: &str) -> Result<Vec<Self>, Error> {
        output
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                let record = Self::parser
                    .parse(line)
                    .map_err(|_err| Error::MalformedLogLine {
                        line: line.to_owned(),
                    })?;
                tracing::trace!(%record, "Parsed commit");
                Ok(record)
            })
            .collect()
    }
}

impl Display for CommitRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:#}|{}|{}|{}",
            self.hash,
            self.parents.iter().map(|parent| format!("{parent:#}")).join(" "),
            self.date,
            self.refs
        )
    }
}
