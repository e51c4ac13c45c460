//! Line-oriented content search with context windows.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use regex::Regex;

use dirlens_core::{
    ContentMatch, FileMatches, FindOptions, Logger, ReadError, SearchError, SearchOptions,
    SearchPattern, default_logger,
};
use dirlens_scan::FileFinder;

/// Searches file content line by line.
///
/// Files are read whole as UTF-8 text. Lines end at `\n`, `\r\n` or a bare
/// `\r`. Each matching line carries up to `context_lines` neighbours on each
/// side, clipped at the file boundaries, and scanning stops once
/// `max_results` matches are collected.
pub struct ContentSearcher {
    finder: FileFinder,
    logger: Arc<dyn Logger>,
}

impl ContentSearcher {
    /// Create a new content searcher.
    pub fn new() -> Self {
        Self {
            finder: FileFinder::new(),
            logger: default_logger(),
        }
    }

    /// Use the given logger here and for file discovery.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.finder = self.finder.with_logger(logger.clone());
        self.logger = logger;
        self
    }

    /// Search a single file.
    pub fn search(
        &self,
        path: &Path,
        pattern: &SearchPattern,
        options: &SearchOptions,
    ) -> Result<Vec<ContentMatch>, ReadError> {
        let matcher = pattern
            .compile(options.case_sensitive)
            .map_err(|e| ReadError::InvalidPattern {
                pattern: pattern.as_str().to_string(),
                reason: e.to_string(),
            })?;
        let text = read_text(path)?;
        Ok(search_text(&text, &matcher, options.max_results, options.context_lines))
    }

    /// Search every file under `root` whose relative path matches `file_pattern`.
    ///
    /// Only files with at least one match are returned, in discovery order.
    /// Files that cannot be read as text are skipped. `max_results` bounds
    /// the total number of matches across all files.
    pub fn search_tree(
        &self,
        root: &Path,
        file_pattern: &str,
        pattern: &SearchPattern,
        find_options: &FindOptions,
        options: &SearchOptions,
    ) -> Result<Vec<FileMatches>, SearchError> {
        let matcher = pattern
            .compile(options.case_sensitive)
            .map_err(|e| SearchError::InvalidPattern {
                pattern: pattern.as_str().to_string(),
                reason: e.to_string(),
            })?;

        let find_options = FindOptions {
            include_files: true,
            include_directories: false,
            ..find_options.clone()
        };
        let candidates = self.finder.find(root, file_pattern, &find_options)?;

        let mut remaining = options.max_results;
        let mut results = Vec::new();
        for path in candidates {
            if remaining == 0 {
                break;
            }
            let text = match read_text(&path) {
                Ok(text) => text,
                Err(err) => {
                    self.logger.debug(&format!("Skipping {err}"));
                    continue;
                }
            };

            let matches = search_text(&text, &matcher, remaining, options.context_lines);
            if !matches.is_empty() {
                remaining -= matches.len();
                results.push(FileMatches { path, matches });
            }
        }

        self.logger.debug(&format!(
            "Content search for '{}' under {}: {} files matched",
            pattern.as_str(),
            root.display(),
            results.len()
        ));
        Ok(results)
    }
}

impl Default for ContentSearcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a whole file as UTF-8 text.
fn read_text(path: &Path) -> Result<String, ReadError> {
    let mut file = File::open(path).map_err(|e| ReadError::open(path, e))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| ReadError::read(path, e))?;
    String::from_utf8(bytes).map_err(|_| ReadError::decode(path))
}

/// Scan `text` for lines matching `matcher`.
pub fn search_text(
    text: &str,
    matcher: &Regex,
    max_results: usize,
    context_lines: usize,
) -> Vec<ContentMatch> {
    let lines = split_lines(text);
    let mut matches = Vec::new();
    if max_results == 0 {
        return matches;
    }

    for (index, line) in lines.iter().enumerate() {
        if !matcher.is_match(line) {
            continue;
        }

        let first = index.saturating_sub(context_lines);
        let last = (index + context_lines).min(lines.len() - 1);
        let context = (first..=last)
            .filter(|&i| i != index)
            .map(|i| format!("{}: {}", i + 1, lines[i]))
            .collect();

        matches.push(ContentMatch {
            line_number: index + 1,
            line: (*line).to_string(),
            context,
        });
        if matches.len() >= max_results {
            break;
        }
    }
    matches
}

/// Split on `\r\n`, `\n` or `\r`. A trailing terminator does not start an
/// extra empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                i += if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                start = i;
            }
            _ => i += 1,
        }
    }
    if start < bytes.len() {
        lines.push(&text[start..]);
    }
    lines
}
