use std::fmt::Display;
use std::str::FromStr;

use derive_more::{AsRef, Constructor, Deref, Into};
use miette::miette;
use winnow::token::take_till;
use winnow::PResult;
use winnow::Parser;

/// A Git commit hash.
///
/// Hashes are opaque: abbreviated, SHA-1 and SHA-256 object IDs are all accepted, as long as they
/// are non-empty and contain no whitespace or `|`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Into, AsRef, Deref, Constructor)]
pub struct CommitHash(String);

impl CommitHash {
    /// Length of an abbreviated hash in graph labels.
    pub const ABBREV_LEN: usize = 7;

    /// Get an abbreviated 7-character Git hash.
    ///
    /// Hashes shorter than that are returned whole.
    pub fn abbrev(&self) -> &str {
        match self.0.char_indices().nth(Self::ABBREV_LEN) {
            Some((end, _)) => &self.0[..end],
            None => &self.0,
        }
    }

    pub fn parser(input: &mut &str) -> PResult<Self> {
        take_till(1.., |c: char| c == '|' || c.is_whitespace())
            .map(|hash: &str| Self::from(hash))
            .parse_next(input)
    }
}

impl Display for CommitHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            Display::fmt(&self.0, f)
        } else {
            Display::fmt(self.abbrev(), f)
        }
    }
}

impl<S> From<S> for CommitHash
where
    S: AsRef<str>,
{
    fn from(value: S) -> Self {
        Self(value.as_ref().into())
    }
}

impl FromStr for CommitHash {
    type Err = miette::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parser.parse(s).map_err(|err| miette!("{err}"))
    }
}
