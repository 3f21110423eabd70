//! Test helpers: a deterministic, dictionary-free analyzer.

use crate::nlp::tokenizer::{MorphAnalyzer, RawNode, TokenizerAdapter};
use crate::types::Morpheme;

const BOUNDARY_FEATURE: &str = "BOS/EOS,*,*,*,*,*,*,*,*";
const UNKNOWN_FEATURE: &str = "名詞,一般,*,*,*,*,*";
const UNKNOWN_ALNUM_FEATURE: &str = "名詞,固有名詞,組織,*,*,*,*";

/// IPADIC-format entries: surface, then the feature string.
const SAMPLE_LEXICON: &[(&str, &str)] = &[
    ("猫", "名詞,一般,*,*,*,*,猫,ネコ,ネコ"),
    ("犬", "名詞,一般,*,*,*,*,犬,イヌ,イヌ"),
    ("鳥", "名詞,一般,*,*,*,*,鳥,トリ,トリ"),
    ("魚", "名詞,一般,*,*,*,*,魚,サカナ,サカナ"),
    ("店舗", "名詞,一般,*,*,*,*,店舗,テンポ,テンポ"),
    ("連絡", "名詞,サ変接続,*,*,*,*,連絡,レンラク,レンラク"),
    ("確認", "名詞,サ変接続,*,*,*,*,確認,カクニン,カクニン"),
    ("端末", "名詞,一般,*,*,*,*,端末,タンマツ,タンマツ"),
    ("エラー", "名詞,一般,*,*,*,*,エラー,エラー,エラー"),
    ("好き", "名詞,形容動詞語幹,*,*,*,*,好き,スキ,スキ"),
    ("これ", "名詞,代名詞,一般,*,*,*,これ,コレ,コレ"),
    ("こと", "名詞,非自立,一般,*,*,*,こと,コト,コト"),
    ("三", "名詞,数,*,*,*,*,三,サン,サン"),
    ("今日", "名詞,副詞可能,*,*,*,*,今日,キョウ,キョー"),
    ("様", "名詞,接尾,人名,*,*,*,様,サマ,サマ"),
    ("見る", "動詞,自立,*,*,一段,基本形,見る,ミル,ミル"),
    ("見", "動詞,自立,*,*,一段,連用形,見る,ミ,ミ"),
    ("する", "動詞,自立,*,*,サ変・スル,基本形,する,スル,スル"),
    ("し", "動詞,自立,*,*,サ変・スル,連用形,する,シ,シ"),
    ("大きい", "形容詞,自立,*,*,形容詞・イ段,基本形,大きい,オオキイ,オオキイ"),
    ("とても", "副詞,助詞類接続,*,*,*,*,とても,トテモ,トテモ"),
    ("が", "助詞,格助詞,一般,*,*,*,が,ガ,ガ"),
    ("を", "助詞,格助詞,一般,*,*,*,を,ヲ,ヲ"),
    ("に", "助詞,格助詞,一般,*,*,*,に,ニ,ニ"),
    ("へ", "助詞,格助詞,一般,*,*,*,へ,ヘ,エ"),
    ("と", "助詞,並立助詞,*,*,*,*,と,ト,ト"),
    ("は", "助詞,係助詞,*,*,*,*,は,ハ,ワ"),
    ("も", "助詞,係助詞,*,*,*,*,も,モ,モ"),
    ("です", "助動詞,*,*,*,特殊・デス,基本形,です,デス,デス"),
    ("た", "助動詞,*,*,*,特殊・タ,基本形,た,タ,タ"),
    ("。", "記号,句点,*,*,*,*,。,。,。"),
    ("、", "記号,読点,*,*,*,*,、,、,、"),
    ("！", "記号,一般,*,*,*,*,！,！,！"),
    ("？", "記号,一般,*,*,*,*,？,？,？"),
];

/// Longest-match analyzer over a small in-memory lexicon.
///
/// Behaves like MeCab where it matters to the pipeline: whitespace is
/// skipped, unknown words get a `*` lemma, ASCII runs become a single
/// unknown token, and empty-surface BOS/EOS nodes frame the output.
#[derive(Debug, Clone)]
pub struct LexiconAnalyzer {
    entries: Vec<(String, String)>,
}

impl LexiconAnalyzer {
    pub fn new(entries: &[(&str, &str)]) -> Self {
        let mut entries: Vec<(String, String)> = entries
            .iter()
            .map(|(s, f)| (s.to_string(), f.to_string()))
            .collect();
        // Longest surface first so the scan below is a longest match.
        entries.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Self { entries }
    }

    pub fn sample() -> Self {
        Self::new(SAMPLE_LEXICON)
    }
}

impl MorphAnalyzer for LexiconAnalyzer {
    fn parse(&self, text: &str) -> Vec<RawNode> {
        let mut nodes = vec![RawNode::new("", BOUNDARY_FEATURE)];
        let mut pos = 0;

        while pos < text.len() {
            let rest = &text[pos..];
            let Some(ch) = rest.chars().next() else {
                break;
            };

            if ch.is_whitespace() {
                pos += ch.len_utf8();
                continue;
            }

            if let Some((surface, feature)) =
                self.entries.iter().find(|(s, _)| rest.starts_with(s.as_str()))
            {
                nodes.push(RawNode::new(surface.as_str(), feature.as_str()));
                pos += surface.len();
                continue;
            }

            if ch.is_ascii_alphanumeric() {
                let len = rest
                    .find(|c: char| !c.is_ascii_alphanumeric())
                    .unwrap_or(rest.len());
                nodes.push(RawNode::new(&rest[..len], UNKNOWN_ALNUM_FEATURE));
                pos += len;
                continue;
            }

            nodes.push(RawNode::new(ch.to_string(), UNKNOWN_FEATURE));
            pos += ch.len_utf8();
        }

        nodes.push(RawNode::new("", BOUNDARY_FEATURE));
        nodes
    }
}

/// Adapter over the sample lexicon.
pub fn sample_adapter() -> TokenizerAdapter {
    TokenizerAdapter::from_analyzer(LexiconAnalyzer::sample())
}

/// Tokenize with the sample lexicon.
pub fn morphemes(text: &str) -> Vec<Morpheme> {
    sample_adapter().analyze(text)
}

/// Noun with the given lemma and first subtype.
pub fn noun(lemma: &str, subtype: &str) -> Morpheme {
    Morpheme::new(lemma, lemma, "名詞").with_subtype(subtype)
}

/// Morpheme with arbitrary POS, surface equal to lemma.
pub fn word(lemma: &str, pos: &str) -> Morpheme {
    Morpheme::new(lemma, lemma, pos)
}
