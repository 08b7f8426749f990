//! # Quill CLI
//!
//! Renders blog articles and Markdown documents to HTML, with heading
//! anchors, a matching table of contents and highlighted code blocks.
//!
//! ## Usage
//!
//! ```bash
//! # Render a file (or stdin) to HTML
//! quill render post.md
//! cat post.md | quill render
//!
//! # Table of contents as a tree, or as JSON
//! quill render post.md --toc
//! quill render post.md --toc --json
//!
//! # HTML and TOC together, as JSON
//! quill render post.md --json
//!
//! # Render an article detail page from a JSON export
//! quill article articles.json hello-quill
//!
//! # List the published articles of an export
//! quill articles articles.json
//!
//! # Themes
//! quill themes
//! quill --theme dracula render post.md
//! quill --theme-file night.tmTheme render post.md
//!
//! # Verbose output for debugging
//! quill -v render post.md      # INFO level
//! quill -vv render post.md     # DEBUG level
//! quill -vvv render post.md    # TRACE level
//! ```
//!
//! Without flags the pipeline is configured from `QUILL_CODE_THEME`,
//! `QUILL_THEME_FILE` and `QUILL_UNIQUE_SLUGS`.

pub use cli::{Cli, Command};

mod cli {
    use clap::{Parser, Subcommand};
    use quill_lib::markdown::highlighting::CodeTheme;
    use std::path::PathBuf;

    /// Command-line interface for the Quill renderer.
    #[derive(Debug, Parser)]
    #[command(name = "quill", about = "Render blog Markdown to HTML", version)]
    pub struct Cli {
        /// Code theme for highlighted blocks (kebab-case name)
        #[arg(long, global = true, value_parser = super::parse_theme_name, conflicts_with = "theme_file")]
        pub theme: Option<CodeTheme>,

        /// Load the code theme from a .tmTheme file
        #[arg(long, global = true, value_name = "PATH")]
        pub theme_file: Option<PathBuf>,

        /// Suffix repeated heading ids with -1, -2, ...
        #[arg(long, global = true)]
        pub unique_slugs: bool,

        /// Increase verbosity (-v INFO, -vv DEBUG, -vvv TRACE, -vvvv TRACE with file/line)
        #[arg(short = 'v', long = "verbose", global = true, action = clap::ArgAction::Count)]
        pub verbose: u8,

        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Debug, Subcommand)]
    pub enum Command {
        /// Render a Markdown document to HTML
        Render {
            /// Input file path (reads from stdin if not provided, use "-" for explicit stdin)
            input: Option<PathBuf>,

            /// Print the table of contents instead of the HTML
            #[arg(long)]
            toc: bool,

            /// Output as JSON
            #[arg(long)]
            json: bool,
        },

        /// Render an article detail page from a JSON export
        Article {
            /// JSON array of article records
            export: PathBuf,

            /// Article slug or 24 hex digit id
            key: String,
        },

        /// List published articles from a JSON export, newest first
        Articles {
            /// JSON array of article records
            export: PathBuf,
        },

        /// List available code themes
        Themes,
    }
}

/// Parses a theme name string into a [`CodeTheme`].
fn parse_theme_name(s: &str) -> Result<quill_lib::markdown::highlighting::CodeTheme, String> {
    quill_lib::markdown::highlighting::CodeTheme::try_from(s).map_err(|e| e.to_string())
}

use quill_lib::markdown::TocEntry;

struct TocNode<'a> {
    entry: &'a TocEntry,
    children: Vec<TocNode<'a>>,
}

/// Nests a flat outline by heading level.
///
/// A heading becomes the child of the nearest preceding heading with a
/// lower level.
fn nest(entries: &[TocEntry]) -> Vec<TocNode<'_>> {
    fn attach<'a>(nodes: &mut Vec<TocNode<'a>>, entry: &'a TocEntry) {
        if let Some(last) = nodes.last_mut()
            && last.entry.level < entry.level
        {
            attach(&mut last.children, entry);
            return;
        }
        nodes.push(TocNode {
            entry,
            children: Vec::new(),
        });
    }

    let mut roots = Vec::new();
    for entry in entries {
        attach(&mut roots, entry);
    }
    roots
}

/// Formats a table of contents as a text tree.
///
/// ## Examples
///
/// ```
/// use quill_cli::format_toc_tree;
/// use quill_lib::markdown::extract_toc;
///
/// let tree = format_toc_tree(&extract_toc("# A\n\n## B\n\n# C"));
/// assert_eq!(tree, "├── A\n│   └── B\n└── C\n\nTotal: 3 headings\n");
/// ```
pub fn format_toc_tree(entries: &[TocEntry]) -> String {
    fn write_node(out: &mut String, node: &TocNode<'_>, prefix: &str, is_last: bool) {
        let connector = if is_last { "└── " } else { "├── " };
        let child_prefix = if is_last { "    " } else { "│   " };
        out.push_str(&format!("{}{}{}\n", prefix, connector, node.entry.text));

        let new_prefix = format!("{}{}", prefix, child_prefix);
        for (i, child) in node.children.iter().enumerate() {
            write_node(out, child, &new_prefix, i == node.children.len() - 1);
        }
    }

    let mut out = String::new();
    let roots = nest(entries);
    for (i, node) in roots.iter().enumerate() {
        write_node(&mut out, node, "", i == roots.len() - 1);
    }

    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(&format!(
        "Total: {} heading{}\n",
        entries.len(),
        if entries.len() == 1 { "" } else { "s" }
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use quill_lib::markdown::highlighting::CodeTheme;

    fn entry(text: &str, level: u8) -> TocEntry {
        TocEntry {
            id: text.to_lowercase(),
            text: text.to_string(),
            level,
        }
    }

    #[test]
    fn test_empty_toc() {
        assert_eq!(format_toc_tree(&[]), "Total: 0 headings\n");
    }

    #[test]
    fn test_nested_toc() {
        let tree = format_toc_tree(&[
            entry("Intro", 1),
            entry("Background", 2),
            entry("Detail", 3),
            entry("Next", 1),
        ]);
        assert_eq!(
            tree,
            "├── Intro\n│   └── Background\n│       └── Detail\n└── Next\n\nTotal: 4 headings\n"
        );
    }

    #[test]
    fn test_toc_starting_below_level_one() {
        let tree = format_toc_tree(&[entry("Sub", 2), entry("Top", 1)]);
        assert_eq!(tree, "├── Sub\n└── Top\n\nTotal: 2 headings\n");
    }

    #[test]
    fn test_parse_render_command() {
        let cli = Cli::try_parse_from(["quill", "-vv", "render", "post.md", "--toc"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Command::Render { toc: true, json: false, .. }));
    }

    #[test]
    fn test_global_theme_after_subcommand() {
        let cli = Cli::try_parse_from(["quill", "render", "--theme", "Dracula"]).unwrap();
        assert_eq!(cli.theme, Some(CodeTheme::Dracula));
    }

    #[test]
    fn test_invalid_theme_is_rejected() {
        assert!(Cli::try_parse_from(["quill", "--theme", "sparkles", "themes"]).is_err());
    }

    #[test]
    fn test_theme_and_theme_file_conflict() {
        let result =
            Cli::try_parse_from(["quill", "--theme", "nord", "--theme-file", "x.tmTheme", "themes"]);
        assert!(result.is_err());
    }
}
