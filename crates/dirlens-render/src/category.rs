//! Extension based file categories for colouring rendered trees.

use std::path::Path;

use crossterm::style::Color;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Visual category of a file, derived from its extension.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FileCategory {
    Documents,
    Code,
    Images,
    Media,
    Archives,
    Config,
    Executables,
    Other,
}

impl FileCategory {
    /// Category for a file extension (without the dot), case-insensitive.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "txt" | "md" | "markdown" | "rst" | "pdf" | "doc" | "docx" | "odt" | "rtf" | "tex"
            | "xls" | "xlsx" | "ods" | "csv" | "ppt" | "pptx" | "odp" | "epub" => Self::Documents,

            "rs" | "py" | "js" | "mjs" | "ts" | "tsx" | "jsx" | "go" | "c" | "h" | "cpp" | "hpp"
            | "cc" | "java" | "kt" | "swift" | "rb" | "php" | "cs" | "scala" | "lua" | "zig"
            | "hs" | "ex" | "exs" | "sql" | "html" | "htm" | "css" | "scss" | "vue" | "svelte" => {
                Self::Code
            }

            "png" | "jpg" | "jpeg" | "gif" | "bmp" | "svg" | "webp" | "ico" | "tif" | "tiff"
            | "heic" | "raw" | "psd" => Self::Images,

            "mp3" | "wav" | "flac" | "aac" | "ogg" | "m4a" | "opus" | "mp4" | "mkv" | "avi"
            | "mov" | "wmv" | "webm" | "flv" | "m4v" => Self::Media,

            "zip" | "tar" | "gz" | "tgz" | "bz2" | "xz" | "zst" | "7z" | "rar" | "iso" | "dmg"
            | "deb" | "rpm" => Self::Archives,

            "json" | "yaml" | "yml" | "toml" | "ini" | "cfg" | "conf" | "env" | "xml" | "lock"
            | "properties" | "plist" => Self::Config,

            "exe" | "msi" | "bat" | "cmd" | "com" | "sh" | "bash" | "zsh" | "ps1" | "bin"
            | "app" | "apk" | "so" | "dll" | "dylib" => Self::Executables,

            _ => Self::Other,
        }
    }

    /// Category for a file name.
    pub fn from_name(name: &str) -> Self {
        Path::new(name)
            .extension()
            .map(|ext| Self::from_extension(&ext.to_string_lossy()))
            .unwrap_or(Self::Other)
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Documents => "Documents",
            Self::Code => "Code",
            Self::Images => "Images",
            Self::Media => "Audio / Video",
            Self::Archives => "Archives",
            Self::Config => "Config",
            Self::Executables => "Executables",
            Self::Other => "Other",
        }
    }

    /// CSS class used by the HTML renderer.
    pub fn css_class(self) -> String {
        format!("cat-{self}")
    }

    /// Accent colour (Tailwind CSS palette).
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Documents => (96, 165, 250),   // blue-400
            Self::Code => (34, 197, 94),         // green-500
            Self::Images => (236, 72, 153),      // pink-500
            Self::Media => (168, 85, 247),       // purple-500
            Self::Archives => (239, 68, 68),     // red-500
            Self::Config => (234, 179, 8),       // yellow-500
            Self::Executables => (249, 115, 22), // orange-500
            Self::Other => (148, 163, 184),      // slate-400
        }
    }

    /// Terminal colour.
    pub fn color(self) -> Color {
        let (r, g, b) = self.rgb();
        Color::Rgb { r, g, b }
    }

    /// CSS hex colour.
    pub fn hex(self) -> String {
        let (r, g, b) = self.rgb();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// All categories, in legend order.
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }
}
