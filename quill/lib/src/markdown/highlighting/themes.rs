//! Code theme enumeration and loading.
//!
//! A rendered page uses exactly one code theme. The default is One Half Dark,
//! the closest embedded relative of Atom's One Dark.

use lazy_static::lazy_static;
use std::convert::TryFrom;
use std::path::{Path, PathBuf};
use syntect::highlighting::{Theme as SyntectTheme, ThemeSet};
use two_face::theme::{EmbeddedLazyThemeSet, EmbeddedThemeName, extra as extra_themes};

use crate::markdown::{MarkdownError, MarkdownResult};

/// Error type for invalid theme name parsing.
#[derive(Debug, Clone)]
pub struct InvalidThemeName(pub String);

impl std::error::Error for InvalidThemeName {}

impl std::fmt::Display for InvalidThemeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let valid: Vec<&str> = CodeTheme::all().iter().map(|t| t.kebab_name()).collect();
        write!(
            f,
            "Invalid theme name: '{}'. Valid names: {}",
            self.0,
            valid.join(", ")
        )
    }
}

/// Embedded code themes selectable by name.
///
/// ## Examples
///
/// ```
/// use quill_lib::markdown::highlighting::CodeTheme;
///
/// let theme = CodeTheme::try_from("one-half-dark").unwrap();
/// assert_eq!(theme, CodeTheme::OneHalfDark);
/// assert_eq!(CodeTheme::default(), CodeTheme::OneHalfDark);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CodeTheme {
    #[default]
    OneHalfDark,
    OneHalfLight,
    Base16OceanDark,
    Base16OceanLight,
    Github,
    ColdarkDark,
    GruvboxDark,
    GruvboxLight,
    SolarizedDark,
    SolarizedLight,
    Nord,
    Dracula,
    Monokai,
    VisualStudioDark,
}

impl TryFrom<&str> for CodeTheme {
    type Error = InvalidThemeName;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "one-half-dark" | "onehalf-dark" | "one-dark" => Ok(CodeTheme::OneHalfDark),
            "one-half-light" | "onehalf-light" => Ok(CodeTheme::OneHalfLight),
            "base16-ocean-dark" | "base16-ocean" => Ok(CodeTheme::Base16OceanDark),
            "base16-ocean-light" => Ok(CodeTheme::Base16OceanLight),
            "github" => Ok(CodeTheme::Github),
            "coldark-dark" | "github-dark" => Ok(CodeTheme::ColdarkDark),
            "gruvbox-dark" | "gruvbox" => Ok(CodeTheme::GruvboxDark),
            "gruvbox-light" => Ok(CodeTheme::GruvboxLight),
            "solarized-dark" | "solarized" => Ok(CodeTheme::SolarizedDark),
            "solarized-light" => Ok(CodeTheme::SolarizedLight),
            "nord" => Ok(CodeTheme::Nord),
            "dracula" => Ok(CodeTheme::Dracula),
            "monokai" => Ok(CodeTheme::Monokai),
            "visual-studio-dark" | "vs-dark" => Ok(CodeTheme::VisualStudioDark),
            _ => Err(InvalidThemeName(s.to_string())),
        }
    }
}

impl CodeTheme {
    /// Returns the kebab-case name of this theme.
    pub const fn kebab_name(self) -> &'static str {
        match self {
            CodeTheme::OneHalfDark => "one-half-dark",
            CodeTheme::OneHalfLight => "one-half-light",
            CodeTheme::Base16OceanDark => "base16-ocean-dark",
            CodeTheme::Base16OceanLight => "base16-ocean-light",
            CodeTheme::Github => "github",
            CodeTheme::ColdarkDark => "coldark-dark",
            CodeTheme::GruvboxDark => "gruvbox-dark",
            CodeTheme::GruvboxLight => "gruvbox-light",
            CodeTheme::SolarizedDark => "solarized-dark",
            CodeTheme::SolarizedLight => "solarized-light",
            CodeTheme::Nord => "nord",
            CodeTheme::Dracula => "dracula",
            CodeTheme::Monokai => "monokai",
            CodeTheme::VisualStudioDark => "vs-dark",
        }
    }

    /// Returns a human-readable description of the theme.
    pub const fn description(self) -> &'static str {
        match self {
            CodeTheme::OneHalfDark => "OneHalf dark - balanced palette inspired by Atom's One Dark",
            CodeTheme::OneHalfLight => "OneHalf light - soft colors on light backgrounds",
            CodeTheme::Base16OceanDark => {
                "Base16 Ocean dark - blue-green palette with excellent contrast"
            }
            CodeTheme::Base16OceanLight => {
                "Base16 Ocean light - soft blue-green palette for light backgrounds"
            }
            CodeTheme::Github => "GitHub's light mode theme - clean and minimal",
            CodeTheme::ColdarkDark => "Coldark dark - GitHub-like blues on a dark background",
            CodeTheme::GruvboxDark => "Gruvbox dark - retro groove warm color palette",
            CodeTheme::GruvboxLight => "Gruvbox light - retro groove with cream backgrounds",
            CodeTheme::SolarizedDark => "Solarized dark - precision colors for machines and people",
            CodeTheme::SolarizedLight => "Solarized light - precision colors on light backgrounds",
            CodeTheme::Nord => "Nord - arctic, north-bluish color palette",
            CodeTheme::Dracula => "Dracula - dark theme with vibrant purple and pink accents",
            CodeTheme::Monokai => "Monokai Extended - classic editor theme with vibrant colors",
            CodeTheme::VisualStudioDark => {
                "Visual Studio Dark - Microsoft's professional dark theme"
            }
        }
    }

    /// Returns all selectable themes.
    pub fn all() -> &'static [CodeTheme] {
        &[
            CodeTheme::OneHalfDark,
            CodeTheme::OneHalfLight,
            CodeTheme::Base16OceanDark,
            CodeTheme::Base16OceanLight,
            CodeTheme::Github,
            CodeTheme::ColdarkDark,
            CodeTheme::GruvboxDark,
            CodeTheme::GruvboxLight,
            CodeTheme::SolarizedDark,
            CodeTheme::SolarizedLight,
            CodeTheme::Nord,
            CodeTheme::Dracula,
            CodeTheme::Monokai,
            CodeTheme::VisualStudioDark,
        ]
    }

    fn to_embedded_name(self) -> EmbeddedThemeName {
        match self {
            CodeTheme::OneHalfDark => EmbeddedThemeName::OneHalfDark,
            CodeTheme::OneHalfLight => EmbeddedThemeName::OneHalfLight,
            CodeTheme::Base16OceanDark => EmbeddedThemeName::Base16OceanDark,
            CodeTheme::Base16OceanLight => EmbeddedThemeName::Base16OceanLight,
            CodeTheme::Github => EmbeddedThemeName::Github,
            CodeTheme::ColdarkDark => EmbeddedThemeName::ColdarkDark,
            CodeTheme::GruvboxDark => EmbeddedThemeName::GruvboxDark,
            CodeTheme::GruvboxLight => EmbeddedThemeName::GruvboxLight,
            CodeTheme::SolarizedDark => EmbeddedThemeName::SolarizedDark,
            CodeTheme::SolarizedLight => EmbeddedThemeName::SolarizedLight,
            CodeTheme::Nord => EmbeddedThemeName::Nord,
            CodeTheme::Dracula => EmbeddedThemeName::Dracula,
            CodeTheme::Monokai => EmbeddedThemeName::MonokaiExtended,
            #[allow(deprecated)]
            CodeTheme::VisualStudioDark => EmbeddedThemeName::VisualStudioDarkPlus,
        }
    }
}

/// Where the single code theme comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeSource {
    /// One of the themes bundled with two-face.
    Embedded(CodeTheme),
    /// A `.tmTheme` file on disk.
    File(PathBuf),
}

impl Default for ThemeSource {
    fn default() -> Self {
        ThemeSource::Embedded(CodeTheme::default())
    }
}

impl ThemeSource {
    /// Short label used in logs and in the `class` of highlighted blocks.
    pub fn label(&self) -> String {
        match self {
            ThemeSource::Embedded(theme) => theme.kebab_name().to_string(),
            ThemeSource::File(path) => path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "custom".to_string()),
        }
    }
}

lazy_static! {
    /// Lazily loaded theme set from two-face.
    static ref THEME_SET: EmbeddedLazyThemeSet = extra_themes();
}

/// Loads the syntect theme described by `source`.
///
/// ## Errors
///
/// Returns [`MarkdownError::ThemeLoad`] if a theme file cannot be read or
/// parsed. Embedded themes always load.
pub(crate) fn load_theme(source: &ThemeSource) -> MarkdownResult<SyntectTheme> {
    match source {
        ThemeSource::Embedded(theme) => Ok(THEME_SET.get(theme.to_embedded_name()).clone()),
        ThemeSource::File(path) => load_theme_file(path),
    }
}

fn load_theme_file(path: &Path) -> MarkdownResult<SyntectTheme> {
    ThemeSet::get_theme(path).map_err(|source| MarkdownError::ThemeLoad {
        path: path.to_path_buf(),
        source,
    })
}
