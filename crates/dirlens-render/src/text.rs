//! Plain text tree rendering.

use crossterm::style::{Color, Stylize};

use dirlens_core::{TreeNode, TreeSummary};

use crate::category::FileCategory;
use crate::{RenderOptions, format_size, summary_line, visible_tree};

// Slate / blue palette (Tailwind CSS), matching the HTML output.
const DIRECTORY: Color = Color::Rgb { r: 59, g: 130, b: 246 };
const TREE_LINES: Color = Color::Rgb { r: 71, g: 85, b: 105 };
const MUTED: Color = Color::Rgb { r: 100, g: 116, b: 139 };

/// Renders a tree with box-drawing connectors:
///
/// ```text
/// project/
/// ├── src/
/// │   └── main.rs (120 B)
/// └── Cargo.toml (310 B)
///
/// 1 directory, 2 files, 430 B
/// ```
#[derive(Debug, Clone, Default)]
pub struct TextRenderer {
    options: RenderOptions,
}

impl TextRenderer {
    /// Create a renderer with the given options.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render `root` to a string. Pure; performs no I/O.
    pub fn render(&self, root: &TreeNode) -> String {
        let tree = visible_tree(root, &self.options);

        let mut out = self.label(&tree);
        out.push('\n');
        self.render_children(&tree, "", &mut out);

        if self.options.show_summary {
            out.push('\n');
            out.push_str(&self.paint(summary_line(&TreeSummary::from_tree(&tree)), MUTED, false));
            out.push('\n');
        }
        out
    }

    fn render_children(&self, node: &TreeNode, prefix: &str, out: &mut String) {
        let count = node.children.len();
        for (i, child) in node.children.iter().enumerate() {
            let last = i + 1 == count;
            let (branch, indent) = if last {
                ("└── ", "    ")
            } else {
                ("├── ", "│   ")
            };

            out.push_str(&self.paint(format!("{prefix}{branch}"), TREE_LINES, false));
            out.push_str(&self.label(child));
            out.push('\n');

            if !child.children.is_empty() {
                self.render_children(child, &format!("{prefix}{indent}"), out);
            }
        }
    }

    fn label(&self, node: &TreeNode) -> String {
        let mut label = if node.is_dir() {
            self.paint(format!("{}/", node.name), DIRECTORY, true)
        } else {
            let category = FileCategory::from_name(&node.name);
            self.paint(node.name.to_string(), category.color(), false)
        };

        if node.truncated {
            label.push_str(" …");
        }
        if self.options.show_size {
            if let Some(size) = node.size {
                label.push(' ');
                label.push_str(&self.paint(format!("({})", format_size(size)), MUTED, false));
            }
        }
        label
    }

    fn paint(&self, text: String, color: Color, bold: bool) -> String {
        if !self.options.colorize {
            return text;
        }
        let styled = text.with(color);
        if bold {
            styled.bold().to_string()
        } else {
            styled.to_string()
        }
    }
}
