//! Rendering options.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Options shared by the text and HTML renderers.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into))]
#[serde(default)]
pub struct RenderOptions {
    /// Append file sizes where the tree has them.
    #[builder(default = "true")]
    pub show_size: bool,

    /// Colour names by category with ANSI escapes (text output only).
    #[builder(default = "false")]
    pub colorize: bool,

    /// Deepest level to render (`None` = everything the tree has).
    #[builder(default)]
    pub max_depth: Option<usize>,

    /// Append a summary line with counts and total size.
    #[builder(default = "true")]
    pub show_summary: bool,
}

impl RenderOptions {
    /// Create a new options builder.
    pub fn builder() -> RenderOptionsBuilder {
        RenderOptionsBuilder::default()
    }

    /// Whether a node at `depth` is drawn.
    pub fn renders_depth(&self, depth: usize) -> bool {
        self.max_depth.is_none_or(|max| depth <= max)
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_size: true,
            colorize: false,
            max_depth: None,
            show_summary: true,
        }
    }
}
