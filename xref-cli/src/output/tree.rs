//! Tree output formatting for hierarchical display.
//!
//! Renders root → serial hierarchies with Unicode box-drawing characters,
//! similar to the `tree` command.

use super::OutputConfig;
use colored::Colorize;

/// Tree output formatter
pub struct TreeOutput;

/// Tree branch characters
struct TreeChars {
    /// Vertical line for continuing branches (|)
    pipe: &'static str,
    /// Branch for non-last items (|-)
    branch: &'static str,
    /// Branch for last item in a level (L-)
    last: &'static str,
    /// Spacing for items under last branch
    space: &'static str,
}

const CHARS: TreeChars = TreeChars {
    pipe: "\u{2502}   ",
    branch: "\u{251c}\u{2500}\u{2500} ",
    last: "\u{2514}\u{2500}\u{2500} ",
    space: "    ",
};

impl TreeOutput {
    /// Create a tree from a root label and its children
    pub fn from_nodes(root: &str, children: &[TreeNode], config: &OutputConfig) -> String {
        let root_str = if config.use_colors() {
            root.bold().to_string()
        } else {
            root.to_string()
        };

        let mut lines = vec![root_str];
        Self::format_nodes(children, config, "", &mut lines);
        lines.join("\n")
    }

    /// Format tree nodes recursively
    fn format_nodes(
        nodes: &[TreeNode],
        config: &OutputConfig,
        prefix: &str,
        lines: &mut Vec<String>,
    ) {
        let use_colors = config.use_colors();
        let len = nodes.len();

        for (i, node) in nodes.iter().enumerate() {
            let is_last = i == len - 1;
            let connector = if is_last { CHARS.last } else { CHARS.branch };
            let child_prefix = format!(
                "{}{}",
                prefix,
                if is_last { CHARS.space } else { CHARS.pipe }
            );

            let name_str = if use_colors {
                match node.kind {
                    NodeKind::Root => node.name.blue().bold().to_string(),
                    NodeKind::Serial => node.name.bright_green().to_string(),
                }
            } else {
                node.name.clone()
            };

            let suffix = node
                .suffix
                .as_ref()
                .map(|s| {
                    if use_colors {
                        format!(" {}", s.dimmed())
                    } else {
                        format!(" {}", s)
                    }
                })
                .unwrap_or_default();

            lines.push(format!("{}{}{}{}", prefix, connector, name_str, suffix));

            if !node.children.is_empty() {
                Self::format_nodes(&node.children, config, &child_prefix, lines);
            }
        }
    }
}

/// A node in the tree structure
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub name: String,
    /// Kind of node (for coloring)
    pub kind: NodeKind,
    /// Optional suffix (e.g., membership counts)
    pub suffix: Option<String>,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            suffix: None,
            children: Vec::new(),
        }
    }

    /// Builder: add a suffix
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// Builder: add children
    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }
}

/// Kind of tree node for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Serial,
}
