//! Grammar loading and the supported-language allow-list.
//!
//! Only the languages listed here are highlighted; any other fence tag falls
//! back to plain escaped code even if syntect happens to know the grammar.

use syntect::parsing::{SyntaxReference, SyntaxSet};
use two_face::syntax::extra_newlines as extra_syntax_set;

/// Supported languages as `(syntect token, accepted fence tags)`.
///
/// The token is looked up with [`SyntaxSet::find_syntax_by_token`], which
/// matches file extensions first and then syntax names.
const SUPPORTED_LANGUAGES: &[(&str, &[&str])] = &[
    ("js", &["js", "javascript", "jsx", "mjs", "cjs"]),
    ("ts", &["ts", "typescript", "tsx"]),
    ("vue", &["vue"]),
    ("py", &["py", "python"]),
    ("bash", &["bash", "sh", "shell", "zsh"]),
    ("json", &["json"]),
    ("html", &["html"]),
    ("css", &["css"]),
    ("scss", &["scss"]),
    ("md", &["md", "markdown"]),
    ("yaml", &["yaml", "yml"]),
    ("sql", &["sql"]),
    ("go", &["go", "golang"]),
    ("rs", &["rust", "rs"]),
    ("java", &["java"]),
    ("cpp", &["cpp", "c++", "cc", "cxx"]),
    ("c", &["c"]),
];

/// Loads syntect's default grammars plus the two-face (bat) extras.
pub(super) fn load_syntax_set() -> SyntaxSet {
    extra_syntax_set()
}

/// Maps a fence tag to its syntect token, if the language is allow-listed.
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// ## Examples
///
/// ```
/// use quill_lib::markdown::highlighting::supported_token;
///
/// assert_eq!(supported_token("Rust"), Some("rs"));
/// assert_eq!(supported_token("yml"), Some("yaml"));
/// assert_eq!(supported_token("fooscript"), None);
/// ```
pub fn supported_token(lang: &str) -> Option<&'static str> {
    let lang = lang.trim();
    if lang.is_empty() {
        return None;
    }
    SUPPORTED_LANGUAGES
        .iter()
        .find(|(_, aliases)| aliases.iter().any(|alias| alias.eq_ignore_ascii_case(lang)))
        .map(|(token, _)| *token)
}

/// Resolves an allow-listed fence tag to a grammar in `syntax_set`.
pub(super) fn find_syntax<'s>(syntax_set: &'s SyntaxSet, lang: &str) -> Option<&'s SyntaxReference> {
    supported_token(lang).and_then(|token| syntax_set.find_syntax_by_token(token))
}
