//! # rapid-textmining
//!
//! Text mining for Japanese free text such as customer-support logs.
//!
//! A text is tokenized once into a morpheme sequence; every view is derived
//! from that sequence:
//!
//! - **Frequency report**: ranked lemma counts with their share of the text
//! - **Word-cloud source**: weighted word list for an external renderer
//! - **Co-occurrence network**: lemmas joined when they share sentences
//! - **KWIC**: every occurrence of a keyword with its surrounding context
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use rapid_textmining::{AnalysisSpec, NoopObserver, TextMiner};
//!
//! let spec = AnalysisSpec::from_json_validated(r#"{
//!     "tokenizer": { "dictionary": "ipadic/system.dic.zst" },
//!     "views": { "kwic": { "keyword": "確認" } }
//! }"#)?;
//! let miner = TextMiner::from_spec(&spec)?;
//!
//! if let Some(results) = miner
//!     .run_text("店舗から連絡がありました。端末を確認します。", &spec, &mut NoopObserver)
//!     .ready()
//! {
//!     for row in &results.report.rows {
//!         println!("{} {} {:.3}%", row.lemma, row.count, row.percentage);
//!     }
//! }
//! ```
//!
//! Empty or insufficient input is never an error: views return
//! [`Outcome::Empty`] with an [`EmptyReason`] describing what was missing.

pub mod errors;
pub mod filter;
pub mod graph;
pub mod kwic;
pub mod nlp;
pub mod pipeline;
pub mod render;
pub mod report;
pub mod types;

#[cfg(test)]
mod test_utils;

pub use errors::{MiningError, Result};
pub use filter::{filter, FilterSpec};
pub use graph::{build_cooccurrence_graph, CooccurrenceBuilder, CooccurrenceGraph, GraphEdge, GraphNode};
pub use kwic::{search as kwic_search, KeyField, KwicHit};
pub use nlp::stopwords::{parse_stopword_list, StopwordFilter};
pub use nlp::tokenizer::{MorphAnalyzer, RawNode, TokenizerAdapter, TokenizerStatus, VibratoAnalyzer};
pub use pipeline::observer::{NoopObserver, PipelineObserver, RecordingObserver, StageReport};
pub use pipeline::runner::{
    AnalysisResults, KwicRequest, NetworkRequest, ReportRequest, TextMiner, WordCloudRequest,
};
pub use pipeline::spec::AnalysisSpec;
pub use report::wordcloud::{word_cloud_source, WordCloudSource};
pub use report::{report, FrequencyReport, FrequencyRow};
pub use types::{Document, EmptyReason, Morpheme, Outcome};
