// SPDX-License-Identifier: PMPL-1.0-or-later
//! Document language detection by text sampling.
//!
//! Counts stop-word hits over the first words of the document. Good enough
//! to fill a missing `/Lang` entry for the common Latin-script languages;
//! anything ambiguous yields `None` and is left for manual review.

use regex::Regex;
use std::collections::HashMap;

/// Words sampled from the start of the document
const SAMPLE_WORDS: usize = 500;

/// Stop-word hits required before trusting a guess
const MIN_HITS: usize = 5;

const STOP_WORDS: &[(&str, &[&str])] = &[
    ("en", &["the", "and", "of", "to", "is", "in", "that", "for", "with", "this", "are", "was", "be", "by", "on"]),
    ("de", &["der", "die", "und", "das", "ist", "nicht", "mit", "den", "von", "zu", "ein", "eine", "auf", "sich", "dem"]),
    ("fr", &["le", "la", "les", "et", "des", "est", "une", "dans", "pour", "que", "qui", "du", "sur", "pas", "avec"]),
    ("es", &["el", "los", "las", "y", "del", "es", "una", "por", "con", "para", "que", "se", "al", "como", "pero"]),
    ("it", &["il", "di", "che", "e", "della", "per", "una", "sono", "gli", "con", "non", "nel", "delle", "anche", "alla"]),
    ("nl", &["de", "het", "een", "en", "van", "is", "dat", "niet", "met", "voor", "zijn", "op", "ook", "wordt", "aan"]),
    ("pt", &["o", "os", "e", "do", "da", "em", "um", "uma", "para", "com", "não", "que", "dos", "das", "mais"]),
];

/// Detect the language of a word sequence.
///
/// Returns a BCP 47 primary language tag such as `"en"`.
pub fn detect_language<'a>(words: impl IntoIterator<Item = &'a str>) -> Option<&'static str> {
    let token = match Regex::new(r"\p{L}+") {
        Ok(re) => re,
        Err(_) => return None,
    };

    let mut hits: HashMap<&'static str, usize> = HashMap::new();

    for word in words.into_iter().take(SAMPLE_WORDS) {
        for m in token.find_iter(word) {
            let lower = m.as_str().to_lowercase();
            for (lang, stop_words) in STOP_WORDS {
                if stop_words.contains(&lower.as_str()) {
                    *hits.entry(*lang).or_insert(0) += 1;
                }
            }
        }
    }

    // Table order breaks ties deterministically
    let mut ranked: Vec<(&'static str, usize)> = STOP_WORDS
        .iter()
        .map(|(lang, _)| (*lang, hits.get(lang).copied().unwrap_or(0)))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    match ranked.as_slice() {
        [(lang, best), (_, runner_up), ..] if *best >= MIN_HITS && best > runner_up => Some(*lang),
        _ => None,
    }
}
