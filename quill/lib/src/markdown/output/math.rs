//! Math markup for client-side typesetting.
//!
//! TeX is escaped and wrapped in the `\(...\)` / `\[...\]` delimiters that
//! KaTeX's auto-render extension scans for.

/// Markup for `$...$`.
pub fn inline_math(tex: &str) -> String {
    format!(
        r#"<span class="math math-inline">\({}\)</span>"#,
        html_escape::encode_text(tex)
    )
}

/// Markup for `$$...$$`.
pub fn display_math(tex: &str) -> String {
    format!(
        r#"<span class="math math-display">\[{}\]</span>"#,
        html_escape::encode_text(tex)
    )
}
