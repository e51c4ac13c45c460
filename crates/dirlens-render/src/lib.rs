//! Tree rendering for dirlens.
//!
//! Renders [`TreeNode`] trees built by `dirlens-scan` as:
//!
//! - **Text** - box-drawing connectors, optional sizes and ANSI colours
//! - **HTML** - a standalone document with per-category styling and a legend
//!
//! Rendering is a pure function of the tree and [`RenderOptions`].
//!
//! ```rust
//! use dirlens_render::{RenderOptions, TextRenderer};
//! use dirlens_core::TreeNode;
//!
//! let mut root = TreeNode::new_directory("demo", "/demo");
//! root.children.push(TreeNode::new_file("a.txt", "/demo/a.txt", Some(12)));
//!
//! let text = TextRenderer::new(RenderOptions::default()).render(&root);
//! assert!(text.starts_with("demo/\n└── a.txt (12 B)\n"));
//! ```

mod category;
mod html;
mod options;
mod text;

pub use category::FileCategory;
pub use html::{HtmlRenderer, escape};
pub use options::{RenderOptions, RenderOptionsBuilder};
pub use text::TextRenderer;

use dirlens_core::{TreeNode, TreeSummary};

/// Format a byte count using binary units (KiB, MiB, ...).
pub fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// One line describing a tree: directory and file counts, then total size.
pub fn summary_line(summary: &TreeSummary) -> String {
    let mut line = format!(
        "{} {}, {} {}, {}",
        summary.directories,
        if summary.directories == 1 { "directory" } else { "directories" },
        summary.files,
        if summary.files == 1 { "file" } else { "files" },
        format_size(summary.total_file_bytes)
    );
    if summary.truncated {
        line.push_str(", truncated");
    }
    line
}

/// The part of `root` that the options allow to be drawn.
///
/// Directories cut off by the render depth are marked truncated.
pub fn visible_tree(root: &TreeNode, options: &RenderOptions) -> TreeNode {
    let mut tree = root.clone();
    if let Some(max_depth) = options.max_depth {
        prune(&mut tree, max_depth);
    }
    tree
}

fn prune(node: &mut TreeNode, remaining: usize) {
    if remaining == 0 {
        if !node.children.is_empty() {
            node.children.clear();
            node.truncated = true;
        }
        return;
    }
    for child in &mut node.children {
        prune(child, remaining - 1);
    }
}
