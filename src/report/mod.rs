//! Frequency reporting
//!
//! Aggregates filtered morphemes into ranked lemma frequencies. Percentages
//! are computed against the *unfiltered* morpheme count, so they describe
//! how much of the whole text a word accounts for and need not sum to 100.

pub mod wordcloud;

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::filter::FilterSpec;
use crate::types::Morpheme;

/// Decimal places kept in [`FrequencyRow::percentage`].
pub const PERCENT_DECIMALS: usize = 3;

/// One ranked lemma.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyRow {
    /// 1-based rank
    pub rank: usize,
    pub lemma: String,
    pub count: usize,
    /// `100 * count / total_morphemes`, rounded to 3 decimals
    pub percentage: f64,
    /// POS of the last filtered occurrence of the lemma
    pub pos: String,
}

/// Frequency table plus the totals it was computed from.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FrequencyReport {
    pub rows: Vec<FrequencyRow>,
    /// Length of the unfiltered morpheme sequence
    pub total_morphemes: usize,
    /// Number of morphemes that passed the filter
    pub total_filtered: usize,
}

impl FrequencyReport {
    /// Whether the report has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of distinct lemmas.
    pub fn distinct(&self) -> usize {
        self.rows.len()
    }

    /// Look up a row by lemma.
    pub fn row(&self, lemma: &str) -> Option<&FrequencyRow> {
        self.rows.iter().find(|r| r.lemma == lemma)
    }
}

/// Count lemmas in first-occurrence order.
pub fn count_lemmas<'a, I>(morphemes: I) -> Vec<(&'a str, usize)>
where
    I: IntoIterator<Item = &'a Morpheme>,
{
    let mut index: FxHashMap<&'a str, usize> = FxHashMap::default();
    let mut counts: Vec<(&'a str, usize)> = Vec::new();

    for m in morphemes {
        let lemma = m.lemma.as_str();
        match index.get(lemma) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(lemma, counts.len());
                counts.push((lemma, 1));
            }
        }
    }
    counts
}

/// Sort counts descending; equal counts keep first-occurrence order.
pub fn most_common<'a>(mut counts: Vec<(&'a str, usize)>) -> Vec<(&'a str, usize)> {
    // sort_by is stable, which is what makes ties deterministic.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Round a percentage to [`PERCENT_DECIMALS`] places.
///
/// Rounds the exact binary value, with exact ties going to the even digit
/// (0.0625 becomes 0.062).
pub fn round_percentage(value: f64) -> f64 {
    format!("{:.*}", PERCENT_DECIMALS, value).parse().unwrap_or(value)
}

/// Build the frequency report for `morphemes` under `spec`.
pub fn report(morphemes: &[Morpheme], spec: &FilterSpec) -> FrequencyReport {
    if morphemes.is_empty() {
        return FrequencyReport::default();
    }
    let total_morphemes = morphemes.len();

    let filtered: Vec<&Morpheme> = spec.select(morphemes).collect();
    if filtered.is_empty() {
        return FrequencyReport {
            rows: Vec::new(),
            total_morphemes,
            total_filtered: 0,
        };
    }

    // Reverse scan: the first POS seen from the end is the last occurrence.
    let mut representative: FxHashMap<&str, &str> = FxHashMap::default();
    for m in filtered.iter().rev() {
        representative.entry(m.lemma.as_str()).or_insert(m.pos.as_str());
    }

    let counts = count_lemmas(filtered.iter().copied());
    let total_filtered = counts.iter().map(|(_, c)| c).sum();

    let rows = most_common(counts)
        .into_iter()
        .enumerate()
        .map(|(i, (lemma, count))| FrequencyRow {
            rank: i + 1,
            lemma: lemma.to_string(),
            count,
            percentage: round_percentage(100.0 * count as f64 / total_morphemes as f64),
            pos: representative.get(lemma).copied().unwrap_or_default().to_string(),
        })
        .collect();

    FrequencyReport {
        rows,
        total_morphemes,
        total_filtered,
    }
}
