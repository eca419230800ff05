//! Commit dependency graphs.

use rustc_hash::FxHashSet;
use tracing::instrument;

use crate::git::CommitHash;
use crate::git::CommitRecord;

mod dot;

/// Whether a [`Node`] is a commit from the log or a parent outside of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Commit,
    /// A parent hash that names no commit in the log, e.g. when history is truncated.
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: CommitHash,
    /// Display label. Lines are separated by `\n`.
    pub label: String,
    pub kind: NodeKind,
}

impl Node {
    fn commit(record: &CommitRecord) -> Self {
        let mut label = format!("{}\n{}", record.hash.abbrev(), record.date);
        if !record.refs.is_empty() {
            label.push_str(&format!("\n({})", record.refs));
        }

        Self {
            id: record.hash.clone(),
            label,
            kind: NodeKind::Commit,
        }
    }

    fn placeholder(hash: &CommitHash) -> Self {
        Self {
            id: hash.clone(),
            label: hash.abbrev().to_owned(),
            kind: NodeKind::Placeholder,
        }
    }
}

/// A directed edge from a parent commit to its child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub parent: CommitHash,
    pub child: CommitHash,
}

/// A graph of commits and their parent relationships.
///
/// Built once from a list of [`CommitRecord`]s and then rendered; see the [`Display`] impl for
/// the Graphviz DOT source.
///
/// [`Display`]: std::fmt::Display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl DependencyGraph {
    /// Build a graph with one node per commit and one edge per parent relationship.
    ///
    /// Edges are neither deduplicated nor checked for cycles. Parents which aren't in `commits`
    /// get a [`NodeKind::Placeholder`] node so every edge has two endpoints.
    #[instrument(level = "trace", skip_all, fields(commits = commits.len()))]
    pub fn from_commits(commits: &[CommitRecord]) -> Self {
        let mut nodes: Vec<_> = commits.iter().map(Node::commit).collect();
        let mut edges = Vec::new();

        let known: FxHashSet<&CommitHash> = commits.iter().map(|commit| &commit.hash).collect();
        let mut placeholders = FxHashSet::default();

        for commit in commits {
            for parent in &commit.parents {
                if !known.contains(parent) && placeholders.insert(parent) {
                    nodes.push(Node::placeholder(parent));
                }
                edges.push(Edge {
                    parent: parent.clone(),
                    child: commit.hash.clone(),
                });
            }
        }

        if !placeholders.is_empty() {
            tracing::debug!(
                count = placeholders.len(),
                "Some parent commits are not in the history; drawing placeholders"
            );
        }

        Self { nodes, edges }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Nodes for parents which aren't in the commit log.
    pub fn dangling_parents(&self) -> impl Iterator<Item = &Node> {
        self.nodes
            .iter()
            .filter(|node| node.kind == NodeKind::Placeholder)
    }
}
