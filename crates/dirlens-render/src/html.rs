//! Self-contained HTML tree documents.

use std::collections::BTreeMap;

use itertools::Itertools;

use dirlens_core::{TreeNode, TreeSummary};

use crate::category::FileCategory;
use crate::{RenderOptions, format_size, summary_line, visible_tree};

const BASE_CSS: &str = "\
body { background: #0f172a; color: #f1f5f9; font-family: ui-monospace, SFMono-Regular, Menlo, monospace; margin: 2rem; }
h1 { color: #60a5fa; font-size: 1.25rem; }
ul.tree, ul.tree ul { list-style: none; margin: 0; padding-left: 1.25rem; border-left: 1px solid #475569; }
ul.tree { border-left: none; padding-left: 0; }
li { padding: 0.1rem 0; }
.dir > .name { color: #3b82f6; font-weight: bold; }
.size, .truncated, footer { color: #64748b; }
.legend { margin-top: 1.5rem; display: flex; flex-wrap: wrap; gap: 1rem; }
.swatch { display: inline-block; width: 0.75rem; height: 0.75rem; margin-right: 0.35rem; border-radius: 2px; }
";

/// Renders a tree as a standalone HTML document with embedded CSS.
///
/// Files are tagged with a `cat-*` class per [`FileCategory`], and a legend
/// lists how many files fall in each category.
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer {
    options: RenderOptions,
    title: Option<String>,
}

impl HtmlRenderer {
    /// Create a renderer with the given options.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            title: None,
        }
    }

    /// Set the document title. Defaults to the root name.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Render `root` to a complete HTML document. Pure; performs no I/O.
    pub fn render(&self, root: &TreeNode) -> String {
        let tree = visible_tree(root, &self.options);
        let title = escape(self.title.as_deref().unwrap_or(&tree.name));

        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
        out.push_str(&format!("<title>{title}</title>\n<style>\n{}</style>\n", stylesheet()));
        out.push_str("</head>\n<body>\n");
        out.push_str(&format!("<h1>{title}</h1>\n<ul class=\"tree\">\n"));
        self.render_node(&tree, &mut out);
        out.push_str("</ul>\n");

        if self.options.show_summary {
            out.push_str(&format!(
                "<footer class=\"summary\">{}</footer>\n",
                escape(&summary_line(&TreeSummary::from_tree(&tree)))
            ));
        }
        out.push_str(&legend(&tree));
        out.push_str("</body>\n</html>\n");
        out
    }

    fn render_node(&self, node: &TreeNode, out: &mut String) {
        if node.is_dir() {
            out.push_str(&format!(
                "<li class=\"dir\"><span class=\"name\">{}/</span>",
                escape(&node.name)
            ));
            if node.truncated {
                out.push_str(" <span class=\"truncated\">…</span>");
            }
            if !node.children.is_empty() {
                out.push_str("\n<ul>\n");
                for child in &node.children {
                    self.render_node(child, out);
                }
                out.push_str("</ul>\n");
            }
            out.push_str("</li>\n");
        } else {
            let category = FileCategory::from_name(&node.name);
            out.push_str(&format!(
                "<li class=\"file {}\"><span class=\"name\">{}</span>",
                category.css_class(),
                escape(&node.name)
            ));
            if self.options.show_size {
                if let Some(size) = node.size {
                    out.push_str(&format!(" <span class=\"size\">{}</span>", format_size(size)));
                }
            }
            out.push_str("</li>\n");
        }
    }
}

/// Base styles plus one rule per category colour.
fn stylesheet() -> String {
    let categories = FileCategory::all()
        .map(|c| {
            format!(
                ".{class} > .name {{ color: {hex}; }}\n.swatch.{class} {{ background: {hex}; }}\n",
                class = c.css_class(),
                hex = c.hex()
            )
        })
        .join("");
    format!("{BASE_CSS}{categories}")
}

fn legend(tree: &TreeNode) -> String {
    let mut counts: BTreeMap<FileCategory, usize> = BTreeMap::new();
    tree.walk(&mut |node, _| {
        if node.is_file() {
            *counts.entry(FileCategory::from_name(&node.name)).or_default() += 1;
        }
    });

    let entries = FileCategory::all()
        .map(|c| {
            format!(
                "<span class=\"legend-item\"><span class=\"swatch {}\"></span>{} ({})</span>",
                c.css_class(),
                escape(c.label()),
                counts.get(&c).copied().unwrap_or(0)
            )
        })
        .join("\n");
    format!("<section class=\"legend\">\n{entries}\n</section>\n")
}

/// Escape text for use in HTML element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> TreeNode {
        let mut root = TreeNode::new_directory("site", "/site");
        let mut assets = TreeNode::new_directory("assets", "/site/assets");
        assets.children.push(TreeNode::new_file("logo.png", "/site/assets/logo.png", Some(2048)));
        root.children.push(assets);
        root.children.push(TreeNode::new_file("<index>.html", "/site/<index>.html", Some(10)));
        root.children.push(TreeNode::new_file("config.toml", "/site/config.toml", Some(5)));
        root
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&#39;");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_document_structure() {
        let html = HtmlRenderer::default().render(&sample_tree());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>site</title>"));
        assert!(html.contains("<li class=\"dir\"><span class=\"name\">assets/</span>"));
        assert!(html.contains("<li class=\"file cat-images\"><span class=\"name\">logo.png</span> <span class=\"size\">2 KiB</span></li>"));
        assert!(html.contains("&lt;index&gt;.html"));
        assert!(!html.contains("<index>"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_legend_counts_and_css() {
        let html = HtmlRenderer::default().render(&sample_tree());
        assert!(html.contains(".cat-code > .name { color: #22c55e; }"));
        assert!(html.contains("Images (1)"));
        assert!(html.contains("Config (1)"));
        assert!(html.contains("Code (1)"));
        assert!(html.contains("Archives (0)"));
    }

    #[test]
    fn test_custom_title_and_depth() {
        let options = RenderOptions {
            max_depth: Some(1),
            show_size: false,
            ..RenderOptions::default()
        };
        let html = HtmlRenderer::new(options)
            .with_title("Site & assets")
            .render(&sample_tree());
        assert!(html.contains("<title>Site &amp; assets</title>"));
        assert!(html.contains("assets/</span> <span class=\"truncated\">"));
        assert!(!html.contains("logo.png"));
        assert!(!html.contains("class=\"size\""));
    }
}
