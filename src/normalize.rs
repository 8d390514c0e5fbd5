use std::sync::LazyLock;

use regex::Regex;

// ── Character cleanup ────────────────────────────────────────────────────
//
// The converter emits full-width CJK punctuation and form feeds at page
// boundaries. Downstream classifiers only deal with the ASCII forms.
const REPLACE_MAP: &[(char, &str)] = &[
    ('（', "("),
    ('）', ")"),
    ('，', ","),
    ('；', ";"),
    ('：', ":"),
    ('“', "\""),
    ('”', "\""),
    ('。', "."),
    ('　', " "),
    ('—', "-"),
    ('―', "-"),
    ('－', "-"),
    ('\u{c}', " "),
];

/// Column gap: pdftotext -layout renders side-by-side columns as one
/// physical line with a wide whitespace run between them.
static RE_COLUMN_GAP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{8,}").unwrap());

static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

// Page numbers, the document title, and the three part banners carry no
// lexical content.
static RE_NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+$|^英语词根词缀记忆大全$|^第一部分|^第二部分|^第三部分").unwrap()
});

pub fn contains_cjk(s: &str) -> bool {
    s.chars().any(|c| ('\u{4e00}'..='\u{9fff}').contains(&c))
}

/// Split one physical line into column fragments, dropping empty ones.
fn split_multicolumn_line(line: &str) -> Vec<&str> {
    RE_COLUMN_GAP
        .split(line)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

fn clean_line(fragment: &str) -> String {
    let mut s = String::with_capacity(fragment.len());
    'outer: for c in fragment.chars() {
        for (from, to) in REPLACE_MAP {
            if c == *from {
                s.push_str(to);
                continue 'outer;
            }
        }
        s.push(c);
    }
    let s = RE_WHITESPACE.replace_all(&s, " ");
    s.trim()
        .replace(" .", ".")
        .replace(" ,", ",")
        .replace(" ;", ";")
}

fn is_noise(line: &str) -> bool {
    line.is_empty() || RE_NOISE.is_match(line)
}

fn paren_balance(text: &str) -> i32 {
    let open = text.matches('(').count() as i32;
    let close = text.matches(')').count() as i32;
    open - close
}

/// Re-join lines the source layout broke mid-sentence.
///
/// A fragment is appended to the running buffer when the buffer still has
/// an open parenthesis, or when the buffer is a short all-Latin stub
/// (under 20 chars, no CJK) — almost always a heading split across a
/// layout break. Known ambiguity: the short-stub rule can occasionally
/// glue two unrelated short headings together; kept as-is.
fn merge_broken_lines(fragments: Vec<String>) -> Vec<String> {
    let mut merged = Vec::with_capacity(fragments.len());
    let mut buf = String::new();
    let mut balance = 0i32;

    for line in fragments {
        if line.is_empty() {
            continue;
        }
        if buf.is_empty() {
            balance = paren_balance(&line);
            buf = line;
        } else if balance > 0 || (buf.chars().count() < 20 && !contains_cjk(&buf)) {
            balance += paren_balance(&line);
            buf.push(' ');
            buf.push_str(&line);
        } else {
            merged.push(std::mem::replace(&mut buf, line));
            balance = paren_balance(&buf);
        }
    }

    if !buf.is_empty() {
        merged.push(buf);
    }
    merged
}

/// Turn raw converted text into clean, single-topic logical lines.
pub fn logical_lines(raw_text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    for raw in raw_text.lines() {
        for part in split_multicolumn_line(raw) {
            let line = clean_line(part);
            if is_noise(&line) {
                continue;
            }
            lines.push(line);
        }
    }
    merge_broken_lines(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_line_fullwidth_punctuation() {
        assert_eq!(clean_line("（ab＋c）"), "(ab＋c)");
        assert_eq!(clean_line("表示“反对”，的"), "表示\"反对\",的");
        assert_eq!(clean_line("word  \u{c}  拆分 ."), "word 拆分.");
    }

    #[test]
    fn test_split_multicolumn() {
        let parts = split_multicolumn_line("anti- 反对         -ology 学科");
        assert_eq!(parts, vec!["anti- 反对", "-ology 学科"]);
        // Runs shorter than 8 spaces are not column gaps.
        let parts = split_multicolumn_line("anti- 反对   学科");
        assert_eq!(parts.len(), 1);
    }

    #[test]
    fn test_noise_filtering() {
        let lines = logical_lines("42\n英语词根词缀记忆大全\n第一部分 常用前缀\nanti- 表示反对");
        assert_eq!(lines, vec!["anti- 表示反对"]);
    }

    #[test]
    fn test_merge_on_open_parenthesis() {
        let lines = logical_lines("antibody (anti\n+body) 反体\n下一行内容很长足够独立成行");
        assert_eq!(lines[0], "antibody (anti +body) 反体");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_merge_short_latin_stub() {
        // "anti-" alone is a short all-Latin stub: the continuation is merged.
        let lines = logical_lines("anti-\n表示\"反对\"的意思");
        assert_eq!(lines, vec!["anti- 表示\"反对\"的意思"]);
    }

    #[test]
    fn test_no_merge_after_cjk_line() {
        let lines = logical_lines("表示反对的意思\nword");
        assert_eq!(lines, vec!["表示反对的意思", "word"]);
    }
}
