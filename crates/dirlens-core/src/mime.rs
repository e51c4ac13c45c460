//! Extension based MIME type lookup.

/// MIME type reported for extensions not in the table.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// MIME type reported for directories.
pub const DIRECTORY_MIME_TYPE: &str = "inode/directory";

/// Guess a MIME type from a file extension (without the dot).
///
/// Lookup is case-insensitive; unknown or empty extensions map to
/// [`DEFAULT_MIME_TYPE`].
pub fn mime_from_extension(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        // Text and documents
        "txt" | "log" | "text" => "text/plain",
        "md" | "markdown" => "text/markdown",
        "csv" => "text/csv",
        "tsv" => "text/tab-separated-values",
        "rtf" => "application/rtf",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "odt" => "application/vnd.oasis.opendocument.text",
        "epub" => "application/epub+zip",

        // Web and code
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" | "mjs" | "cjs" => "text/javascript",
        "ts" | "tsx" => "text/typescript",
        "jsx" => "text/jsx",
        "py" => "text/x-python",
        "rs" => "text/x-rust",
        "go" => "text/x-go",
        "java" => "text/x-java",
        "c" | "h" => "text/x-c",
        "cpp" | "cc" | "cxx" | "hpp" => "text/x-c++",
        "rb" => "text/x-ruby",
        "php" => "application/x-httpd-php",
        "sh" | "bash" | "zsh" => "application/x-sh",
        "sql" => "application/sql",
        "wasm" => "application/wasm",

        // Data and configuration
        "json" => "application/json",
        "xml" => "application/xml",
        "yaml" | "yml" => "application/yaml",
        "toml" => "application/toml",
        "ini" | "cfg" | "conf" => "text/plain",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "tif" | "tiff" => "image/tiff",
        "heic" => "image/heic",

        // Audio
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "flac" => "audio/flac",
        "aac" => "audio/aac",
        "m4a" => "audio/mp4",

        // Video
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "avi" => "video/x-msvideo",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",

        // Archives
        "zip" => "application/zip",
        "tar" => "application/x-tar",
        "gz" | "tgz" => "application/gzip",
        "bz2" => "application/x-bzip2",
        "xz" => "application/x-xz",
        "7z" => "application/x-7z-compressed",
        "rar" => "application/vnd.rar",

        // Fonts
        "ttf" => "font/ttf",
        "otf" => "font/otf",
        "woff" => "font/woff",
        "woff2" => "font/woff2",

        _ => DEFAULT_MIME_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(mime_from_extension("txt"), "text/plain");
        assert_eq!(mime_from_extension("json"), "application/json");
        assert_eq!(mime_from_extension("png"), "image/png");
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(mime_from_extension("JPG"), "image/jpeg");
        assert_eq!(mime_from_extension("Md"), "text/markdown");
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(mime_from_extension("xyz123"), DEFAULT_MIME_TYPE);
        assert_eq!(mime_from_extension(""), DEFAULT_MIME_TYPE);
    }
}
