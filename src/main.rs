//! dirlens - Directory intelligence from the command line.
//!
//! Usage:
//!   dirlens info PATH                  Describe a file or directory
//!   dirlens list [DIR]                 List a directory's entries
//!   dirlens tree [DIR]                 Show a depth-limited tree
//!   dirlens find ROOT PATTERN          Find entries by glob
//!   dirlens rename ROOT PATTERN ...    Batch rename with preview
//!   dirlens search FILE PATTERN        Search one file's content
//!   dirlens grep ROOT PATTERN          Search content across files
//!   dirlens hash FILE                  Compute a content digest
//!   dirlens --help                     Show help

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result, bail};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use dirlens_analyze::{ContentMatch, ContentSearcher, HashAlgorithm, HashComputer};
use dirlens_core::{
    EntryRecord, FindOptions, Logger, RegexFlags, RenameOptions, RenameRule, RenameStatus,
    SearchOptions, SearchPattern, TracingLogger, TreeOptions,
};
use dirlens_ops::RenameEngine;
use dirlens_render::{HtmlRenderer, RenderOptions, TextRenderer, format_size};
use dirlens_scan::{FileFinder, RecordBuilder, TreeBuilder};

/// Environment variable holding the log filter, e.g. `DIRLENS_LOG=debug`.
const LOG_ENV: &str = "DIRLENS_LOG";

#[derive(Parser)]
#[command(
    name = "dirlens",
    version,
    about = "Directory intelligence: records, trees, finding, rename, search and hashing",
    long_about = "dirlens inspects directory trees.\n\n\
                  Every subcommand prints human-readable text by default, or \
                  JSON with `--format json`."
)]
struct Cli {
    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Log debug details to stderr (overrides DIRLENS_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Describe a single file or directory
    Info {
        /// Path to describe
        path: PathBuf,
    },

    /// List the entries of a directory
    List {
        /// Directory to list
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Include hidden entries
        #[arg(short, long)]
        all: bool,
    },

    /// Show a depth-limited directory tree
    Tree {
        /// Root of the tree
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Levels to expand below the root
        #[arg(short, long, default_value = "3")]
        depth: usize,

        /// Include hidden entries
        #[arg(short, long)]
        all: bool,

        /// Show directories only
        #[arg(short = 'D', long)]
        dirs_only: bool,

        /// Omit file sizes
        #[arg(long)]
        no_size: bool,

        /// Colorize output
        #[arg(long, default_value = "auto")]
        color: ColorChoice,

        /// Write an HTML document to this file
        #[arg(long)]
        html: Option<PathBuf>,
    },

    /// Find entries whose relative path matches a glob
    Find {
        /// Directory to search
        root: PathBuf,

        /// Glob pattern, e.g. "*.rs" or "src/**/*.toml"
        pattern: String,

        /// Only look at direct children of the root
        #[arg(long)]
        no_recursive: bool,

        /// Include hidden entries
        #[arg(short, long)]
        all: bool,

        /// Restrict results to files or directories
        #[arg(short = 't', long = "type")]
        kind: Option<EntryType>,

        /// Maximum depth to descend
        #[arg(long)]
        max_depth: Option<usize>,

        /// Stop after this many results
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Rename matching files by substitution
    Rename {
        /// Directory holding the files
        root: PathBuf,

        /// Glob selecting files to rename
        pattern: String,

        /// Text (or regex with --regex) to replace
        #[arg(long)]
        find: String,

        /// Replacement; `$1`, `${name}` expand capture groups with --regex
        #[arg(long)]
        replace: String,

        /// Treat --find as a regular expression
        #[arg(long)]
        regex: bool,

        /// Regex flags: g (all matches), i, m, s, x
        #[arg(long, default_value = "")]
        flags: String,

        /// Include files in subdirectories
        #[arg(short, long)]
        recursive: bool,

        /// Include hidden files
        #[arg(short, long)]
        all: bool,

        /// Show what would change without renaming anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Search the content of one file
    Search {
        /// File to search
        path: PathBuf,

        /// Text (or regex with --regex) to look for
        pattern: String,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// Search content across files matching a glob
    Grep {
        /// Directory to search
        root: PathBuf,

        /// Text (or regex with --regex) to look for
        pattern: String,

        /// Glob selecting files to search
        #[arg(short, long, default_value = "*")]
        glob: String,

        /// Include hidden files
        #[arg(short, long)]
        all: bool,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// Compute a streaming content digest
    Hash {
        /// File to hash
        path: PathBuf,

        /// Digest algorithm
        #[arg(short, long, default_value = "sha256")]
        algorithm: HashAlgorithm,
    },
}

#[derive(clap::Args)]
struct SearchArgs {
    /// Treat the pattern as a regular expression
    #[arg(long)]
    regex: bool,

    /// Match case exactly
    #[arg(short = 's', long)]
    case_sensitive: bool,

    /// Lines of context around each match
    #[arg(short = 'C', long, default_value_t = dirlens_core::DEFAULT_CONTEXT_LINES)]
    context: usize,

    /// Stop after this many matches
    #[arg(short = 'n', long, default_value_t = dirlens_core::DEFAULT_MAX_RESULTS)]
    max_results: usize,
}

impl SearchArgs {
    fn pattern(&self, text: &str) -> SearchPattern {
        if self.regex {
            SearchPattern::regex(text)
        } else {
            SearchPattern::literal(text)
        }
    }

    fn options(&self) -> Result<SearchOptions> {
        SearchOptions::builder()
            .max_results(self.max_results)
            .context_lines(self.context)
            .case_sensitive(self.case_sensitive)
            .build()
            .context("Invalid search options")
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EntryType {
    #[value(name = "f")]
    File,
    #[value(name = "d")]
    Directory,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);
    let logger: Arc<dyn Logger> = Arc::new(TracingLogger);

    match cli.command {
        Command::Info { path } => run_info(&path, cli.format, logger),
        Command::List { path, all } => run_list(&path, all, cli.format, logger),
        Command::Tree {
            path,
            depth,
            all,
            dirs_only,
            no_size,
            color,
            html,
        } => {
            let options = TreeOptions::builder()
                .max_depth(Some(depth))
                .include_hidden(all)
                .include_files(!dirs_only)
                .include_sizes(!no_size)
                .build()
                .context("Invalid tree options")?;
            let colorize = match color {
                ColorChoice::Always => true,
                ColorChoice::Never => false,
                ColorChoice::Auto => std::io::stdout().is_terminal(),
            };
            run_tree(&path, &options, colorize, html, cli.format, logger)
        }
        Command::Find {
            root,
            pattern,
            no_recursive,
            all,
            kind,
            max_depth,
            limit,
        } => {
            let options = FindOptions::builder()
                .recursive(!no_recursive)
                .include_hidden(all)
                .include_files(!matches!(kind, Some(EntryType::Directory)))
                .include_directories(!matches!(kind, Some(EntryType::File)))
                .max_depth(max_depth)
                .max_results(limit)
                .build()
                .context("Invalid find options")?;
            run_find(&root, &pattern, &options, cli.format, logger)
        }
        Command::Rename {
            root,
            pattern,
            find,
            replace,
            regex,
            flags,
            recursive,
            all,
            dry_run,
        } => {
            let rule = if regex {
                let flags: RegexFlags = flags
                    .parse()
                    .map_err(|e: String| color_eyre::eyre::eyre!(e))
                    .context("Invalid regex flags")?;
                RenameRule::regex(find, flags, replace)
            } else {
                RenameRule::literal(find, replace)
            };
            let options = RenameOptions {
                recursive,
                include_hidden: all,
                dry_run,
            };
            run_rename(&root, &pattern, &rule, &options, cli.format, logger)
        }
        Command::Search {
            path,
            pattern,
            search,
        } => {
            let matches = ContentSearcher::new()
                .with_logger(logger)
                .search(&path, &search.pattern(&pattern), &search.options()?)
                .with_context(|| format!("Search failed for {}", path.display()))?;
            match cli.format {
                OutputFormat::Json => print_json(&matches),
                OutputFormat::Text => {
                    print_matches(None, &matches);
                    Ok(())
                }
            }
        }
        Command::Grep {
            root,
            pattern,
            glob,
            all,
            search,
        } => {
            let find_options = FindOptions {
                include_hidden: all,
                ..FindOptions::files_only()
            };
            let results = ContentSearcher::new()
                .with_logger(logger)
                .search_tree(
                    &root,
                    &glob,
                    &search.pattern(&pattern),
                    &find_options,
                    &search.options()?,
                )
                .with_context(|| format!("Search failed under {}", root.display()))?;
            match cli.format {
                OutputFormat::Json => print_json(&results),
                OutputFormat::Text => {
                    for file in &results {
                        print_matches(Some(&file.path), &file.matches);
                    }
                    Ok(())
                }
            }
        }
        Command::Hash { path, algorithm } => {
            let digest = HashComputer::new()
                .with_logger(logger)
                .hash(&path, algorithm)
                .with_context(|| format!("Cannot hash {}", path.display()))?;
            match cli.format {
                OutputFormat::Json => print_json(&digest),
                OutputFormat::Text => {
                    println!("{}  {}", digest.hex, path.display());
                    Ok(())
                }
            }
        }
    }
}

/// Install the stderr subscriber. `-v` wins over `DIRLENS_LOG`.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_info(path: &Path, format: OutputFormat, logger: Arc<dyn Logger>) -> Result<()> {
    let record = RecordBuilder::new()
        .with_logger(logger)
        .build(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;

    if let OutputFormat::Json = format {
        return print_json(&record);
    }

    let entry = record.entry();
    println!("{}", "─".repeat(60));
    println!(" {}", entry.path.display());
    println!("{}", "─".repeat(60));
    match &record {
        EntryRecord::File(file) => {
            println!(" type         file");
            println!(" size         {} ({} bytes)", format_size(file.size), file.size);
        }
        EntryRecord::Directory(dir) => {
            let approx = if dir.size_is_estimate { "~" } else { "" };
            println!(" type         directory");
            println!(" items        {}", dir.item_count);
            println!(
                " size         {approx}{} ({approx}{} bytes{})",
                format_size(dir.total_size),
                dir.total_size,
                if dir.size_is_estimate { ", estimated" } else { "" }
            );
        }
    }
    println!(" mime         {}", entry.mime_type);
    println!(" permissions  {}", entry.permissions);
    println!(" modified     {}", entry.timestamps.modified.to_rfc3339());
    println!(" created      {}", entry.timestamps.created.to_rfc3339());
    println!(" accessed     {}", entry.timestamps.accessed.to_rfc3339());

    let flags: Vec<&str> = [
        (entry.hidden, "hidden"),
        (entry.symlink, "symlink"),
        (entry.executable, "executable"),
    ]
    .into_iter()
    .filter_map(|(set, name)| set.then_some(name))
    .collect();
    if !flags.is_empty() {
        println!(" flags        {}", flags.join(", "));
    }
    Ok(())
}

fn run_list(
    path: &Path,
    include_hidden: bool,
    format: OutputFormat,
    logger: Arc<dyn Logger>,
) -> Result<()> {
    let records = RecordBuilder::new()
        .with_logger(logger)
        .list_directory(path, include_hidden)
        .with_context(|| format!("Cannot list {}", path.display()))?;

    if let OutputFormat::Json = format {
        return print_json(&records);
    }

    for record in &records {
        let entry = record.entry();
        let (marker, suffix, approx) = match record {
            EntryRecord::Directory(dir) => ('d', "/", if dir.size_is_estimate { "~" } else { "" }),
            EntryRecord::File(_) => ('-', "", ""),
        };
        println!(
            "{marker} {}  {:>11}  {}{suffix}",
            entry.permissions,
            format!("{approx}{}", format_size(record.size())),
            entry.name
        );
    }
    Ok(())
}

fn run_tree(
    path: &Path,
    options: &TreeOptions,
    colorize: bool,
    html: Option<PathBuf>,
    format: OutputFormat,
    logger: Arc<dyn Logger>,
) -> Result<()> {
    let tree = TreeBuilder::new()
        .with_logger(logger)
        .build(path, options)
        .with_context(|| format!("Cannot build tree for {}", path.display()))?;

    let render_options = RenderOptions {
        show_size: options.include_sizes,
        colorize,
        ..RenderOptions::default()
    };

    if let Some(output) = html {
        let document = HtmlRenderer::new(RenderOptions {
            colorize: false,
            ..render_options.clone()
        })
        .render(&tree);
        std::fs::write(&output, document)
            .with_context(|| format!("Cannot write {}", output.display()))?;
        eprintln!("Wrote {}", output.display());
        return Ok(());
    }

    match format {
        OutputFormat::Json => print_json(&tree),
        OutputFormat::Text => {
            print!("{}", TextRenderer::new(render_options).render(&tree));
            Ok(())
        }
    }
}

fn run_find(
    root: &Path,
    pattern: &str,
    options: &FindOptions,
    format: OutputFormat,
    logger: Arc<dyn Logger>,
) -> Result<()> {
    let paths = FileFinder::new()
        .with_logger(logger)
        .find(root, pattern, options)
        .with_context(|| format!("Find failed under {}", root.display()))?;

    match format {
        OutputFormat::Json => print_json(&paths),
        OutputFormat::Text => {
            for path in &paths {
                println!("{}", path.display());
            }
            Ok(())
        }
    }
}

fn run_rename(
    root: &Path,
    pattern: &str,
    rule: &RenameRule,
    options: &RenameOptions,
    format: OutputFormat,
    logger: Arc<dyn Logger>,
) -> Result<()> {
    let report = RenameEngine::new()
        .with_logger(logger)
        .rename(root, pattern, rule, options)
        .with_context(|| format!("Rename failed under {}", root.display()))?;

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => {
            for result in &report.results {
                match result.status {
                    RenameStatus::Skipped => {}
                    RenameStatus::Error => println!(
                        "{:<8} {} ({})",
                        result.status.to_string(),
                        result.old_path.display(),
                        result.error.as_deref().unwrap_or("unknown error")
                    ),
                    _ => println!(
                        "{:<8} {} -> {}",
                        result.status.to_string(),
                        result.old_path.display(),
                        result.new_path.display()
                    ),
                }
            }
            println!("{}", report.summary());
        }
    }

    if !report.is_success() {
        bail!(
            "{} of {} renames failed",
            report.count(RenameStatus::Error),
            report.results.len()
        );
    }
    Ok(())
}

fn print_matches(path: Option<&Path>, matches: &[ContentMatch]) {
    for m in matches {
        match path {
            Some(path) => println!("{}:{}: {}", path.display(), m.line_number, m.line),
            None => println!("{}: {}", m.line_number, m.line),
        }
        for line in &m.context {
            println!("    {line}");
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
