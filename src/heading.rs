use std::sync::LazyLock;

use regex::Regex;

use crate::example::parse_example;
use crate::stoplist::TOKEN_STOPLIST;

// ── Regex patterns ───────────────────────────────────────────────────────
//
// Real data examples:
//   1、anti- 表示"反对"的意思
//   23、ab,abs 加在词根前,表示"相反,变坏,离去"
//   108. -ology 表示"…学科"
//   7、medi(o) 表示"中间"        ← spelling variant, collapses to "medio"

/// Numbered heading: digits, a `、` or `.` separator, then the body.
static RE_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)[、.]\s*(.+)$").unwrap());

/// Bracketed annotations and `=xxx` cross-references carry no tokens.
static RE_BRACKET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[[^\]]*\]").unwrap());
static RE_CROSS_REF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"=[A-Za-z ,/]+").unwrap());

/// Quoted meaning after the 表示 ("denotes") marker.
static RE_QUOTED_MEANING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("表示\\s*\"([^\"]+)\"").unwrap());

/// CJK character immediately followed by `-letter`: the dash is a
/// typographic artifact, not a suffix marker.
static RE_CJK_DASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\u{4e00}-\u{9fff}]-[A-Za-z]").unwrap());

/// One or more affix/root tokens plus an optional shared Chinese meaning,
/// extracted from a numbered heading line.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedHeading {
    /// Detection order, deduplicated.
    pub tokens: Vec<String>,
    /// May be empty; back-filled later from example explanations.
    pub meaning: String,
}

/// Try to parse a logical line as a numbered heading.
///
/// Numbered example lines ("3. abandon (a+bandon) 丢弃") also start with
/// digits; if the body independently parses as an example the line is not
/// a heading. Heading bodies with an inline gloss ("anti- 表示...") would
/// pass the example pattern too, so the 表示 marker keeps them headings.
pub fn parse_heading(line: &str) -> Option<ParsedHeading> {
    let caps = RE_HEADING.captures(line)?;
    let body = caps.get(2)?.as_str();
    if !body.contains("表示") && parse_example(body, false).is_some() {
        return None;
    }
    Some(ParsedHeading {
        tokens: parse_root_tokens(body),
        meaning: extract_meaning(body),
    })
}

// ── Token extraction ─────────────────────────────────────────────────────

/// A raw token candidate found by the scanner, before normalization.
enum RawToken {
    /// `-xxxx` or `xxxx-` or bare `xxxx`
    Plain(String),
    /// `xxxx(yyy)` — spelling variant with a parenthesized alternate ending
    Variant(String, String),
}

/// Scan for candidate tokens. Patterns are tried in preference order at
/// each position (suffix, prefix, variant, bare) and every match must be
/// bounded by non-Latin characters on both sides.
fn scan_tokens(text: &str) -> Vec<RawToken> {
    let chars: Vec<char> = text.chars().collect();
    let letter_run = |from: usize| -> usize {
        chars[from..]
            .iter()
            .take_while(|c| c.is_ascii_alphabetic())
            .count()
    };
    let is_letter = |idx: usize| -> bool {
        chars.get(idx).is_some_and(|c| c.is_ascii_alphabetic())
    };
    let collect = |from: usize, to: usize| -> String { chars[from..to].iter().collect() };

    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        if i > 0 && is_letter(i - 1) {
            i += 1;
            continue;
        }

        // Suffix form: -xxxx
        if chars[i] == '-' {
            let run = letter_run(i + 1);
            if (1..=12).contains(&run) && !is_letter(i + 1 + run) {
                tokens.push(RawToken::Plain(collect(i, i + 1 + run)));
                i += 1 + run;
                continue;
            }
            i += 1;
            continue;
        }

        if is_letter(i) {
            let run = letter_run(i);
            if run <= 12 {
                let end = i + run;
                // Prefix form: xxxx-
                if chars.get(end) == Some(&'-') && !is_letter(end + 1) {
                    tokens.push(RawToken::Plain(collect(i, end + 1)));
                    i = end + 1;
                    continue;
                }
                // Variant form: xxxx(yyy)
                if chars.get(end) == Some(&'(') {
                    let inner = letter_run(end + 1);
                    if (1..=3).contains(&inner)
                        && chars.get(end + 1 + inner) == Some(&')')
                        && !is_letter(end + 2 + inner)
                    {
                        tokens.push(RawToken::Variant(
                            collect(i, end),
                            collect(end + 1, end + 1 + inner),
                        ));
                        i = end + 2 + inner;
                        continue;
                    }
                }
                // Bare token: 2-12 letters
                if run >= 2 && !is_letter(end) {
                    tokens.push(RawToken::Plain(collect(i, end)));
                    i = end;
                    continue;
                }
            }
        }
        i += 1;
    }
    tokens
}

/// Extract normalized morpheme tokens from a heading body.
pub fn parse_root_tokens(raw: &str) -> Vec<String> {
    let text = RE_BRACKET.replace_all(raw, " ");
    let text = RE_CROSS_REF.replace_all(&text, " ");
    let text = text
        .replace('、', " ")
        .replace('/', " ")
        .replace('，', " ")
        .replace(',', " ");

    let cjk_dash_artifact = RE_CJK_DASH.is_match(raw);
    let prefix_cue = raw.contains("加在") || raw.contains("前缀");

    let mut uniq: Vec<String> = Vec::new();
    for raw_tok in scan_tokens(&text) {
        let mut tok = match raw_tok {
            RawToken::Plain(t) => t,
            RawToken::Variant(stem, alt) => format!("{stem}{alt}"),
        }
        .to_lowercase();

        if TOKEN_STOPLIST.contains(&tok.as_str()) {
            continue;
        }
        if tok.starts_with('-') && cjk_dash_artifact {
            tok.remove(0);
        }
        if !tok.starts_with('-') && !tok.ends_with('-') && tok.len() <= 4 && prefix_cue {
            tok.push('-');
        }
        if !uniq.contains(&tok) {
            uniq.push(tok);
        }
    }
    uniq
}

// ── Meaning extraction ───────────────────────────────────────────────────

/// Meaning preference: quoted text after 表示, else the trimmed remainder
/// after 表示 (≤ 120 chars), else empty.
pub fn extract_meaning(line: &str) -> String {
    if let Some(caps) = RE_QUOTED_MEANING.captures(line) {
        return caps[1].trim().to_string();
    }
    if let Some((_, after)) = line.split_once("表示") {
        let after = after.trim_matches(&[' ', ':'][..]);
        let truncated: String = after.chars().take(120).collect();
        return truncated.trim().to_string();
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_prefix_heading() {
        let h = parse_heading("1、anti- 表示\"反对\"的意思").unwrap();
        assert_eq!(h.tokens, vec!["anti-"]);
        assert_eq!(h.meaning, "反对");
    }

    #[test]
    fn test_parse_suffix_heading_dot_separator() {
        let h = parse_heading("108. -ology 表示\"…学科\"").unwrap();
        assert_eq!(h.tokens, vec!["-ology"]);
        assert_eq!(h.meaning, "…学科");
    }

    #[test]
    fn test_multiple_tokens_with_prefix_cue() {
        // Bare short tokens in a prefix-list heading get a synthesized dash.
        let h = parse_heading("23、ab,abs 加在词根前,表示\"相反,变坏,离去\"").unwrap();
        assert_eq!(h.tokens, vec!["ab-", "abs-"]);
        assert_eq!(h.meaning, "相反,变坏,离去");
    }

    #[test]
    fn test_variant_token_collapses() {
        // Five letters after collapsing, so no synthesized prefix dash.
        let h = parse_heading("7、medi(o) 加在词根前,表示\"中间\"").unwrap();
        assert_eq!(h.tokens, vec!["medio"]);
    }

    #[test]
    fn test_short_variant_gets_prefix_dash() {
        let h = parse_heading("8、di(s) 加在词根前,表示\"分开\"").unwrap();
        assert_eq!(h.tokens, vec!["dis-"]);
    }

    #[test]
    fn test_unquoted_meaning_truncated() {
        let m = extract_meaning("pseudo- 表示: 假的假的假的");
        assert_eq!(m, "假的假的假的");
        let long = format!("pre- 表示{}", "长".repeat(150));
        assert_eq!(extract_meaning(&long).chars().count(), 120);
    }

    #[test]
    fn test_stoplist_tokens_dropped() {
        let tokens = parse_root_tokens("able ably year 表示能力");
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_bracket_and_cross_ref_stripped() {
        let tokens = parse_root_tokens("contra- [kontra] =counter 表示\"相反\"");
        assert_eq!(tokens, vec!["contra-"]);
    }

    #[test]
    fn test_cjk_dash_artifact_stripped() {
        // The dash after a CJK char is layout noise, not a suffix marker.
        let tokens = parse_root_tokens("词根-logy 的形式");
        assert_eq!(tokens, vec!["logy"]);
    }

    #[test]
    fn test_numbered_example_not_a_heading() {
        assert!(parse_heading("3. abandon (a+bandon) 丢弃").is_none());
    }

    #[test]
    fn test_overlong_token_rejected() {
        let tokens = parse_root_tokens("supercalifragilist 表示");
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_duplicate_tokens_deduped() {
        let tokens = parse_root_tokens("anti-/anti- 表示\"反对\"");
        assert_eq!(tokens, vec!["anti-"]);
    }
}
