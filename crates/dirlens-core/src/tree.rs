//! Depth-bounded display tree.

use std::cmp::Ordering;
use std::path::PathBuf;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Type of a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NodeType {
    File,
    Directory,
}

/// A single node of a display tree.
///
/// Children are ordered directories first, then by name. A directory that
/// sits at the depth bound is not expanded: it has no children and
/// `truncated` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    /// File/directory name (not full path).
    pub name: CompactString,

    /// Canonical path.
    pub path: PathBuf,

    /// Node type.
    #[serde(rename = "type")]
    pub node_type: NodeType,

    /// Size in bytes (files only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// Children, directories first then by name.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,

    /// Directory was not expanded because of the depth bound.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub truncated: bool,
}

impl TreeNode {
    /// Create a file leaf.
    pub fn new_file(name: impl Into<CompactString>, path: impl Into<PathBuf>, size: Option<u64>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            node_type: NodeType::File,
            size,
            children: Vec::new(),
            truncated: false,
        }
    }

    /// Create a directory node with no children yet.
    pub fn new_directory(name: impl Into<CompactString>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            node_type: NodeType::Directory,
            size: None,
            children: Vec::new(),
            truncated: false,
        }
    }

    /// Check if this node is a directory.
    pub fn is_dir(&self) -> bool {
        self.node_type == NodeType::Directory
    }

    /// Check if this node is a file.
    pub fn is_file(&self) -> bool {
        self.node_type == NodeType::File
    }

    /// Sort direct children into display order.
    pub fn sort_children(&mut self) {
        self.children.sort_by(display_order);
    }

    /// Nesting depth below this node (0 for a leaf).
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Visit every node depth-first, parents before children.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a TreeNode, usize)) {
        let mut stack = vec![(self, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            visit(node, depth);
            for child in node.children.iter().rev() {
                stack.push((child, depth + 1));
            }
        }
    }
}

/// Display ordering: directories before files, then by name.
pub fn display_order(a: &TreeNode, b: &TreeNode) -> Ordering {
    match (a.is_dir(), b.is_dir()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a.name.cmp(&b.name),
    }
}

/// Summary statistics for a built tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSummary {
    /// Number of file nodes.
    pub files: u64,
    /// Number of directory nodes, excluding the root.
    pub directories: u64,
    /// Sum of known file sizes.
    pub total_file_bytes: u64,
    /// Deepest nesting level reached.
    pub max_depth: usize,
    /// Some directory was left unexpanded by the depth bound.
    pub truncated: bool,
}

impl TreeSummary {
    /// Compute the summary of a tree.
    pub fn from_tree(root: &TreeNode) -> Self {
        let mut summary = Self::default();
        root.walk(&mut |node, depth| {
            summary.max_depth = summary.max_depth.max(depth);
            summary.truncated |= node.truncated;
            match node.node_type {
                NodeType::File => {
                    summary.files += 1;
                    summary.total_file_bytes += node.size.unwrap_or(0);
                }
                NodeType::Directory if depth > 0 => summary.directories += 1,
                NodeType::Directory => {}
            }
        });
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> TreeNode {
        let mut root = TreeNode::new_directory("root", "/root");
        let mut sub = TreeNode::new_directory("sub", "/root/sub");
        sub.children.push(TreeNode::new_file("inner.txt", "/root/sub/inner.txt", Some(4)));
        root.children.push(TreeNode::new_file("b.txt", "/root/b.txt", Some(10)));
        root.children.push(sub);
        root.children.push(TreeNode::new_file("a.txt", "/root/a.txt", Some(5)));
        root
    }

    #[test]
    fn test_sort_children_dirs_first() {
        let mut root = sample_tree();
        root.sort_children();
        let names: Vec<_> = root.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["sub", "a.txt", "b.txt"]);
    }

    #[test]
    fn test_depth() {
        let root = sample_tree();
        assert_eq!(root.depth(), 2);
        assert_eq!(TreeNode::new_file("x", "/x", None).depth(), 0);
    }

    #[test]
    fn test_summary() {
        let summary = TreeSummary::from_tree(&sample_tree());
        assert_eq!(summary.files, 3);
        assert_eq!(summary.directories, 1);
        assert_eq!(summary.total_file_bytes, 19);
        assert_eq!(summary.max_depth, 2);
        assert!(!summary.truncated);
    }

    #[test]
    fn test_walk_order_is_preorder() {
        let mut root = sample_tree();
        root.sort_children();
        let mut seen = Vec::new();
        root.walk(&mut |node, _| seen.push(node.name.to_string()));
        assert_eq!(seen, vec!["root", "sub", "inner.txt", "a.txt", "b.txt"]);
    }
}
