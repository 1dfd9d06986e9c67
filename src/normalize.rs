// src/normalize.rs
//! Text-normalization pipeline for noisy Indonesian social-media comments.
//!
//! The full pipeline is `normalize`, which composes four operations in a
//! fixed order:
//!   1. `normalize_unicode` — NFKD decomposition, then drop non-ASCII.
//!   2. `clean_text` — lowercase, emoji transliteration, and an ordered list
//!      of noise rewrites (URLs, mentions, symbols, numbers, repetitions).
//!   3. `join_spaced_letters` — rejoin evasively spaced-out keywords.
//!   4. `replace_slang` — per-token substitution from the slang dictionary.
//!
//! Each stage assumes the output shape of the previous one; the rewrite order
//! inside `clean_text` is load-bearing (URL stripping must run before symbol
//! stripping, whitespace collapsing before repetition collapsing).

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use unicode_normalization::UnicodeNormalization;

/// Decompose under NFKD and drop every code point without a direct ASCII
/// representation. Collapses homoglyphs and diacritics ("𝐠𝐚𝐜𝐨𝐫" → "gacor",
/// "héllo" → "hello"); non-Latin scripts are lost entirely, an accepted
/// tradeoff for this domain.
pub fn normalize_unicode(text: &str) -> String {
    text.nfkd().filter(|c| c.is_ascii()).collect()
}

/// Ordered noise rewrites applied by `clean_text` after lowercasing and
/// emoji transliteration. Order matters; see module docs.
static REWRITES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        // emoji shortcode markers produced by the transliteration step
        (Regex::new(r":[a-zA-Z_]+:").unwrap(), " "),
        // URL-like substrings, scheme through next whitespace
        (Regex::new(r"http\S+").unwrap(), ""),
        // @-mentions and #-hashtags
        (Regex::new(r"@\w+|#\w+").unwrap(), ""),
        // anything that is neither a word character nor whitespace
        (Regex::new(r"[^\w\s]").unwrap(), " "),
        // standalone digit runs; digits embedded in tokens survive
        (Regex::new(r"\b\d+\b").unwrap(), " "),
        // whitespace runs
        (Regex::new(r"\s+").unwrap(), " "),
    ]
});

#[inline]
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Replace each emoji code point with its colon-delimited shortcode
/// (🔥 → ":fire:"). Glyphs outside the emoji table pass through unchanged
/// and are dropped by the symbol rewrite later.
fn demojize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut buf = [0u8; 4];
    for c in text.chars() {
        match emojis::get(c.encode_utf8(&mut buf)) {
            Some(e) => {
                out.push(':');
                match e.shortcode() {
                    Some(code) => out.push_str(code),
                    None => {
                        for nc in e.name().chars() {
                            out.push(if nc == ' ' { '_' } else { nc });
                        }
                    }
                }
                out.push(':');
            }
            None => out.push(c),
        }
    }
    out
}

/// Collapse any run of 3 or more identical consecutive word characters down
/// to a single occurrence ("gacorrrr" → "gacor"). Exactly two repeats are
/// left untouched.
fn collapse_char_runs(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let mut j = i + 1;
        while j < chars.len() && chars[j] == c {
            j += 1;
        }
        let run = j - i;
        if is_word_char(c) && run >= 3 {
            out.push(c);
        } else {
            for _ in 0..run {
                out.push(c);
            }
        }
        i = j;
    }
    out
}

/// End-of-string-anchored repetition collapse: if the trailing word-character
/// span is a whole unit immediately repeated to the end of the string, keep a
/// single unit ("gasgasgas" → "gas", "wkwkwk" → "wk"). Leftmost start and
/// longest unit win, matching backtracking-regex semantics; mid-string
/// repetitions are never touched.
fn collapse_repeated_tail(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let n = chars.len();
    // The match must span word characters only, so it can start no earlier
    // than one past the last non-word character.
    let tail_start = chars
        .iter()
        .rposition(|&c| !is_word_char(c))
        .map(|p| p + 1)
        .unwrap_or(0);
    for start in tail_start..n {
        let span = n - start;
        if span < 2 {
            break;
        }
        let mut unit = span / 2;
        while unit >= 1 {
            if span % unit == 0 {
                let base = &chars[start..start + unit];
                if chars[start..].chunks(unit).all(|chunk| chunk == base) {
                    return chars[..start + unit].iter().collect();
                }
            }
            unit -= 1;
        }
    }
    text.to_string()
}

/// Lowercase, transliterate emoji, then apply the ordered noise rewrites and
/// the two repetition collapses. Output is trimmed; it may be empty (pure
/// emoji/URL/mention input), which is a valid result, not an error.
pub fn clean_text(text: &str) -> String {
    let mut out = demojize(&text.to_lowercase());
    for (re, replacement) in REWRITES.iter() {
        out = re.replace_all(&out, *replacement).into_owned();
    }
    out = collapse_char_runs(&out);
    out = collapse_repeated_tail(&out);
    out.trim().to_string()
}

static RE_SPACED_LETTERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:[a-zA-Z]\s){2,}[a-zA-Z]\b").unwrap());

/// Rejoin runs of 3 or more single alphabetic characters each separated by a
/// single space ("p r o m o" → "promo"). Two-letter runs are ambiguous with
/// legitimate short words and are left alone.
pub fn join_spaced_letters(text: &str) -> String {
    let mut out = text.to_string();
    let matches: Vec<String> = RE_SPACED_LETTERS
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect();
    for m in matches {
        let joined: String = m.chars().filter(|c| !c.is_whitespace()).collect();
        out = out.replace(&m, &joined);
    }
    out
}

/// Substitute each whitespace-separated token via the slang map. Unknown
/// tokens pass through unchanged; a multi-word replacement expands into
/// multiple output tokens.
pub fn replace_slang(text: &str, slang: &HashMap<String, String>) -> String {
    text.split_whitespace()
        .map(|w| slang.get(w).map(String::as_str).unwrap_or(w))
        .collect::<Vec<_>>()
        .join(" ")
}

/// The full pipeline. Deterministic and pure apart from the read-only slang
/// map lookup.
pub fn normalize(text: &str, slang: &HashMap<String, String>) -> String {
    let text = normalize_unicode(text);
    let text = clean_text(&text);
    let text = join_spaced_letters(&text);
    replace_slang(&text, slang)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn unicode_strips_diacritics_and_homoglyphs() {
        assert_eq!(normalize_unicode("héllo wörld"), "hello world");
        // mathematical bold letters decompose to plain ASCII under NFKD
        assert_eq!(normalize_unicode("\u{1D420}\u{1D41A}\u{1D42C}"), "gas");
    }

    #[test]
    fn unicode_drops_non_latin_scripts() {
        assert_eq!(normalize_unicode("судьба abc"), " abc");
    }

    #[test]
    fn clean_strips_urls_mentions_hashtags() {
        let out = clean_text("cek http://x.co/promo @user #tag sekarang");
        assert!(!out.contains("http"));
        assert!(!out.contains("user"));
        assert!(!out.contains("tag"));
        assert!(out.contains("cek"));
        assert!(out.contains("sekarang"));
    }

    #[test]
    fn clean_replaces_emoji_with_nothing() {
        // demojize produces ":fire:" which the shortcode rewrite removes
        assert_eq!(clean_text("mantap 🔥🔥"), "mantap");
    }

    #[test]
    fn clean_strips_standalone_numbers_only() {
        assert_eq!(clean_text("menang 100 juta"), "menang juta");
        // digits embedded in a token are kept
        assert_eq!(clean_text("situs slot88 gacor"), "situs slot88 gacor");
    }

    #[test]
    fn clean_collapses_char_runs_of_three_or_more() {
        assert_eq!(clean_text("gacorrrr"), "gacor");
        assert_eq!(clean_text("maaap"), "map");
        // exactly two repeats survive
        assert_eq!(clean_text("maap"), "maap");
    }

    #[test]
    fn clean_collapses_trailing_word_repetition() {
        assert_eq!(clean_text("gasgasgas"), "gas");
        assert_eq!(clean_text("wkwkwk"), "wk");
        // end-of-string anchored: mid-string repetition is untouched
        assert_eq!(clean_text("hahaha lucu"), "hahaha lucu");
        // repetition inside the trailing token still collapses
        assert_eq!(collapse_repeated_tail("xyhaha"), "xyha");
    }

    #[test]
    fn clean_adversarial_sample() {
        let out = clean_text("WKWKWK judol gacorrrr!!! http://x.co @user #tag");
        assert!(!out.contains("http"));
        assert!(!out.contains("@user"));
        assert!(!out.contains("#tag"));
        assert_eq!(out, "wkwkwk judol gacor");
    }

    #[test]
    fn clean_may_produce_empty_string() {
        assert_eq!(clean_text("🔥🔥 http://spam.example @bot"), "");
    }

    #[test]
    fn spaced_letters_rejoined_from_three_up() {
        assert_eq!(join_spaced_letters("p r o m o nanti"), "promo nanti");
        assert_eq!(join_spaced_letters("j u d i online"), "judi online");
        // two spaced letters stay apart
        assert_eq!(join_spaced_letters("di a rumah"), "di a rumah");
    }

    #[test]
    fn slang_substitutes_known_tokens_only() {
        let slang = map(&[("gk", "tidak")]);
        assert_eq!(replace_slang("gk tau", &slang), "tidak tau");
    }

    #[test]
    fn slang_expands_multiword_replacements() {
        let slang = map(&[("judol", "judi online")]);
        assert_eq!(replace_slang("main judol", &slang), "main judi online");
    }

    #[test]
    fn pipeline_end_to_end() {
        let slang = map(&[("wkwkwk", "haha"), ("judol", "judi online")]);
        let out = normalize("WKWKWK judol gacorrrr!!! http://x.co @user #tag", &slang);
        assert_eq!(out, "haha judi online gacor");
    }

    #[test]
    fn pipeline_idempotent_on_clean_text() {
        let slang = map(&[("gk", "tidak")]);
        let x = "saya suka makan nasi goreng";
        let once = normalize(x, &slang);
        assert_eq!(normalize(&once, &slang), once);
    }
}
