//! Japanese font discovery
//!
//! Word clouds and network labels need a font with CJK coverage. The locator
//! tries a configured primary path, then walks the font directories for a
//! known Japanese-capable family. The result is resolved once per locator,
//! so a missing font is reported a single time.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::Serialize;
use tracing::{info, warn};
use walkdir::WalkDir;

/// IPA P Gothic as installed by the `fonts-ipafont-gothic` package.
pub const DEFAULT_PRIMARY_FONT: &str = "/usr/share/fonts/opentype/ipafont-gothic/ipagp.ttf";

/// System font directories searched when the primary font is missing.
pub const DEFAULT_FONT_DIRS: [&str; 5] = [
    "/usr/share/fonts",
    "/usr/local/share/fonts",
    "/Library/Fonts",
    "/System/Library/Fonts",
    "C:\\Windows\\Fonts",
];

/// File-name fragments of Japanese-capable families, most preferred first.
pub const JAPANESE_FAMILIES: [&str; 6] = ["ipagp", "ipag", "ipaexg", "takao", "notosanscjk", "hiragino"];

const FONT_EXTENSIONS: [&str; 3] = ["ttf", "otf", "ttc"];

/// A usable font file and the family name derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FontChoice {
    pub path: PathBuf,
    /// File stem, e.g. `ipagp`
    pub family: String,
}

impl FontChoice {
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let family = path.file_stem()?.to_str()?.to_string();
        Some(Self { path, family })
    }
}

#[derive(Debug)]
pub struct FontLocator {
    primary: Option<PathBuf>,
    search_dirs: Vec<PathBuf>,
    resolved: OnceLock<Option<FontChoice>>,
}

impl Default for FontLocator {
    fn default() -> Self {
        Self::new(Some(DEFAULT_PRIMARY_FONT), DEFAULT_FONT_DIRS.iter().map(PathBuf::from))
    }
}

impl FontLocator {
    pub fn new<P, I, D>(primary: Option<P>, search_dirs: I) -> Self
    where
        P: Into<PathBuf>,
        I: IntoIterator<Item = D>,
        D: Into<PathBuf>,
    {
        Self {
            primary: primary.map(Into::into),
            search_dirs: search_dirs.into_iter().map(Into::into).collect(),
            resolved: OnceLock::new(),
        }
    }

    /// The chosen font, resolving it on first call.
    pub fn locate(&self) -> Option<&FontChoice> {
        self.resolved.get_or_init(|| self.resolve()).as_ref()
    }

    fn resolve(&self) -> Option<FontChoice> {
        if let Some(primary) = &self.primary {
            if primary.is_file() {
                let choice = FontChoice::from_path(primary);
                if let Some(choice) = &choice {
                    info!(font = %choice.path.display(), "using primary Japanese font");
                }
                return choice;
            }
            warn!(font = %primary.display(), "primary Japanese font not found; searching font directories");
        }

        let candidates = self.font_files();
        let found = JAPANESE_FAMILIES.iter().find_map(|family| {
            candidates
                .iter()
                .find(|path| file_name_lower(path).contains(family))
                .and_then(FontChoice::from_path)
        });
        match &found {
            Some(choice) => info!(font = %choice.path.display(), "using fallback Japanese font"),
            None => warn!("no Japanese font found; word cloud and network rendering are disabled"),
        }
        found
    }

    /// Font files under the search directories, in a stable order.
    fn font_files(&self) -> Vec<PathBuf> {
        self.search_dirs
            .iter()
            .filter(|dir| dir.is_dir())
            .flat_map(|dir| {
                WalkDir::new(dir)
                    .follow_links(true)
                    .sort_by_file_name()
                    .into_iter()
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_type().is_file() && is_font_file(e.path()))
                    .map(|e| e.into_path())
            })
            .collect()
    }
}

fn file_name_lower(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| FONT_EXTENSIONS.contains(&e.to_lowercase().as_str()))
}
