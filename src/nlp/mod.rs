//! Natural Language Processing components
//!
//! This module provides the tokenizer adapter, feature decoding, sentence
//! segmentation and stop-word lists.

pub mod feature;
pub mod sentence;
pub mod stopwords;
pub mod tokenizer;
