use std::sync::LazyLock;

use morpheme_types::Example;
use regex::Regex;

use crate::normalize::contains_cjk;

// ── Regex patterns ───────────────────────────────────────────────────────
//
// Real data examples:
//   antibody (anti+body) 反体
//   abnormal (ab+normal正常的) 不正常的,反常的
//   unforeseen (un+fore+seen->没有预见到的)
//   tele phone 电话    ← rejected: "tele" alone is not followed by CJK text

/// Leading English headword: 2-31 letters, internal hyphen/apostrophe ok.
static RE_EXAMPLE_HEAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z][A-Za-z\-']{1,30})(.*)$").unwrap());

/// First parenthesized group = the morphemic decomposition.
static RE_DECOMP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(([^)]{1,180})\)").unwrap());

static RE_PAREN_GROUP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\([^)]*\)").unwrap());

fn truncate_with_ellipsis(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let cut: String = s.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}

/// Parse a logical line as an example-word line.
///
/// Returns None on any non-match; there is no error case. `keep_raw`
/// preserves the source line for diagnostics output.
pub fn parse_example(line: &str, keep_raw: bool) -> Option<Example> {
    // Defensive limit against merge pathologies.
    if line.chars().count() > 1200 {
        return None;
    }

    let caps = RE_EXAMPLE_HEAD.captures(line)?;
    let word = caps.get(1)?.as_str().to_lowercase();
    let rest = caps.get(2)?.as_str().trim();
    if rest.is_empty() {
        return None;
    }

    // An example is only usable if it carries a Chinese explanation.
    if !contains_cjk(rest) {
        return None;
    }

    let mut decomposition = RE_DECOMP
        .captures(rest)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();

    let mut explanation = RE_PAREN_GROUP
        .replace_all(rest, "")
        .trim_matches(&[' ', '.', ';', ':'][..])
        .to_string();
    if explanation.chars().count() > 3000 {
        return None;
    }

    // Some lines put the gloss only after an arrow inside the parentheses.
    if explanation.is_empty() && !decomposition.is_empty() {
        for arrow in ["->", "→"] {
            if let Some((_, after)) = decomposition.rsplit_once(arrow) {
                explanation = after.trim().to_string();
                break;
            }
        }
    }

    if word.chars().count() < 2 || explanation.is_empty() {
        return None;
    }

    decomposition = decomposition
        .replace('+', " + ")
        .replace("  ", " ")
        .trim()
        .to_string();
    decomposition = truncate_with_ellipsis(&decomposition, 220);
    explanation = truncate_with_ellipsis(&explanation, 220);

    Some(Example {
        word,
        decomposition,
        explanation_zh: explanation,
        raw_line: keep_raw.then(|| line.to_string()),
    })
}

/// Infer the root a decomposition implies: the segment before the first
/// `+`, letters and hyphens only, with a trailing `-` synthesized when the
/// segment carries no position marker of its own.
pub fn derive_root(example: &Example) -> Option<String> {
    let decomp = &example.decomposition;
    let (first, _) = decomp.split_once('+')?;
    let mut root: String = first
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || *c == '-')
        .collect();
    if root.is_empty() {
        return None;
    }
    if !root.ends_with('-') && !root.starts_with('-') {
        root.push('-');
    }
    Some(root)
}
