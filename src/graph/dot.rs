//! Graphviz DOT source for [`DependencyGraph`].

use std::fmt::Display;
use std::fmt::Write;

use super::DependencyGraph;
use super::NodeKind;

impl Display for DependencyGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "// Commit Dependency Graph")?;
        writeln!(f, "digraph {{")?;
        writeln!(f, "    node [fontsize=10 shape=ellipse]")?;

        for node in &self.nodes {
            write!(
                f,
                "    {} [label={}",
                Quoted(node.id.as_str()),
                Quoted(&node.label)
            )?;
            if node.kind == NodeKind::Placeholder {
                write!(f, " style=dashed")?;
            }
            writeln!(f, "]")?;
        }

        for edge in &self.edges {
            writeln!(
                f,
                "    {} -> {}",
                Quoted(edge.parent.as_str()),
                Quoted(edge.child.as_str())
            )?;
        }

        writeln!(f, "}}")
    }
}

/// A DOT double-quoted string. Newlines become `\n` line breaks.
struct Quoted<'a>(&'a str);

impl Display for Quoted<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_char('"')?;
        for c in self.0.chars() {
            match c {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                '\n' => f.write_str("\\n")?,
                '\r' => {}
                c => f.write_char(c)?,
            }
        }
        f.write_char('"')
    }
}
