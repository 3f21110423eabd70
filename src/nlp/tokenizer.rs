//! Tokenizer adapter
//!
//! Wraps an external morphological analyzer behind [`MorphAnalyzer`] and
//! converts its raw node stream into [`Morpheme`] records. The analyzer is
//! created lazily, at most once per adapter, and reused read-only afterwards.
//! An initialization failure is logged once; from then on every call returns
//! an empty sequence.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing::{debug, error, info};

use super::feature::decode_node;
use crate::errors::{MiningError, Result};
use crate::types::{EmptyReason, Morpheme, Outcome};

/// One node emitted by an analyzer: a surface string and its raw,
/// comma-separated feature list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawNode {
    pub surface: String,
    pub feature: String,
}

impl RawNode {
    pub fn new(surface: impl Into<String>, feature: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            feature: feature.into(),
        }
    }
}

/// The tokenizer capability the pipeline depends on.
///
/// Implementations must be deterministic: the same text always yields the
/// same nodes.
pub trait MorphAnalyzer: Send + Sync {
    /// Tokenize `text` into raw nodes, in input order.
    fn parse(&self, text: &str) -> Vec<RawNode>;
}

/// [`MorphAnalyzer`] backed by a vibrato system dictionary.
pub struct VibratoAnalyzer {
    tokenizer: vibrato::Tokenizer,
}

impl VibratoAnalyzer {
    /// Load a compiled vibrato dictionary. Files ending in `.zst` are
    /// decompressed on the fly.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| MiningError::DictionaryIo {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = BufReader::new(file);

        let is_zstd = path.extension().map_or(false, |ext| ext == "zst");
        let dict = if is_zstd {
            let decoder =
                zstd::stream::read::Decoder::new(reader).map_err(|source| MiningError::DictionaryIo {
                    path: path.to_path_buf(),
                    source,
                })?;
            Self::read_dictionary(decoder, path)?
        } else {
            Self::read_dictionary(reader, path)?
        };

        // MeCab skips whitespace between tokens; make vibrato do the same.
        let tokenizer = vibrato::Tokenizer::new(dict)
            .ignore_space(true)
            .map_err(|source| MiningError::DictionaryFormat {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self { tokenizer })
    }

    fn read_dictionary<R: Read>(rdr: R, path: &Path) -> Result<vibrato::Dictionary> {
        vibrato::Dictionary::read(rdr).map_err(|source| MiningError::DictionaryFormat {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl MorphAnalyzer for VibratoAnalyzer {
    fn parse(&self, text: &str) -> Vec<RawNode> {
        let mut worker = self.tokenizer.new_worker();
        worker.reset_sentence(text);
        worker.tokenize();
        worker
            .token_iter()
            .map(|t| RawNode::new(t.surface(), t.feature()))
            .collect()
    }
}

/// Initialization state of a [`TokenizerAdapter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenizerStatus {
    /// The analyzer has not been requested yet.
    Uninitialized,
    Ready,
    /// Initialization failed; the message is the reported cause.
    Unavailable(String),
}

type AnalyzerInit = Box<dyn Fn() -> Result<Box<dyn MorphAnalyzer>> + Send + Sync>;
type AnalyzerSlot = std::result::Result<Box<dyn MorphAnalyzer>, String>;

/// Lazily initialized, shared tokenizer.
pub struct TokenizerAdapter {
    init: AnalyzerInit,
    slot: OnceLock<AnalyzerSlot>,
}

impl std::fmt::Debug for TokenizerAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenizerAdapter")
            .field("status", &self.status())
            .finish()
    }
}

impl TokenizerAdapter {
    /// Create an adapter that runs `init` on first use.
    pub fn new<F>(init: F) -> Self
    where
        F: Fn() -> Result<Box<dyn MorphAnalyzer>> + Send + Sync + 'static,
    {
        Self {
            init: Box::new(init),
            slot: OnceLock::new(),
        }
    }

    /// Create an adapter around an analyzer that is already constructed.
    pub fn from_analyzer(analyzer: impl MorphAnalyzer + 'static) -> Self {
        let boxed: Box<dyn MorphAnalyzer> = Box::new(analyzer);
        Self {
            init: Box::new(|| Err(MiningError::MissingDictionary)),
            slot: OnceLock::from(Ok(boxed)),
        }
    }

    /// Create an adapter that loads a vibrato dictionary on first use.
    pub fn vibrato(dictionary: impl Into<PathBuf>) -> Self {
        let dictionary = dictionary.into();
        Self::new(move || {
            let analyzer = VibratoAnalyzer::from_path(&dictionary)?;
            Ok(Box::new(analyzer) as Box<dyn MorphAnalyzer>)
        })
    }

    /// Current initialization state. Does not trigger initialization.
    pub fn status(&self) -> TokenizerStatus {
        match self.slot.get() {
            None => TokenizerStatus::Uninitialized,
            Some(Ok(_)) => TokenizerStatus::Ready,
            Some(Err(msg)) => TokenizerStatus::Unavailable(msg.clone()),
        }
    }

    /// Initialize the analyzer if needed and report whether it is usable.
    pub fn initialize(&self) -> TokenizerStatus {
        let _ = self.analyzer();
        self.status()
    }

    fn analyzer(&self) -> std::result::Result<&dyn MorphAnalyzer, &str> {
        let slot = self.slot.get_or_init(|| match (self.init)() {
            Ok(analyzer) => {
                info!("tokenizer initialized");
                Ok(analyzer)
            }
            Err(err) => {
                error!(error = %err, "tokenizer initialization failed");
                Err(err.to_string())
            }
        });
        match slot {
            Ok(analyzer) => Ok(analyzer.as_ref()),
            Err(msg) => Err(msg.as_str()),
        }
    }

    /// Tokenize `text` into morphemes.
    ///
    /// Blank text or an unavailable tokenizer yields an empty sequence; use
    /// [`TokenizerAdapter::analyze_outcome`] to tell the cases apart.
    pub fn analyze(&self, text: &str) -> Vec<Morpheme> {
        self.analyze_outcome(text).ready().unwrap_or_default()
    }

    /// Tokenize `text`, reporting why nothing was produced.
    pub fn analyze_outcome(&self, text: &str) -> Outcome<Vec<Morpheme>> {
        if text.trim().is_empty() {
            return Outcome::Empty(EmptyReason::BlankInput);
        }
        let analyzer = match self.analyzer() {
            Ok(analyzer) => analyzer,
            Err(message) => {
                return Outcome::Empty(EmptyReason::TokenizerUnavailable {
                    message: message.to_string(),
                })
            }
        };

        let morphemes: Vec<Morpheme> = analyzer
            .parse(text)
            .iter()
            .filter_map(|node| decode_node(&node.surface, &node.feature))
            .collect();
        debug!(chars = text.chars().count(), morphemes = morphemes.len(), "tokenized");

        if morphemes.is_empty() {
            Outcome::Empty(EmptyReason::NoMorphemes)
        } else {
            Outcome::Ready(morphemes)
        }
    }
}
