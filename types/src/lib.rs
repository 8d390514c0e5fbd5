use serde::{Deserialize, Serialize};

// ── Morpheme classification ──────────────────────────────────────────────

/// What kind of word-part an entry describes, inferred from the hyphen
/// marker on its surface form: "anti-" is a prefix, "-ology" a suffix,
/// anything unmarked is a root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Prefix,
    Root,
    Suffix,
}

impl EntryType {
    pub fn infer(root: &str) -> Self {
        if root.starts_with('-') {
            Self::Suffix
        } else if root.ends_with('-') {
            Self::Prefix
        } else {
            Self::Root
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prefix => "prefix",
            Self::Root => "root",
            Self::Suffix => "suffix",
        }
    }
}

// ── Example word ─────────────────────────────────────────────────────────

/// One English word illustrating a root/affix, with its morphemic
/// decomposition and Chinese explanation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Example {
    pub word: String,
    pub decomposition: String,
    #[serde(rename = "explanationZh")]
    pub explanation_zh: String,
    /// Source line the example was parsed from; present only when the
    /// extraction ran with raw-line diagnostics enabled.
    #[serde(rename = "rawLine", default, skip_serializing_if = "Option::is_none")]
    pub raw_line: Option<String>,
}

impl Example {
    /// Amount of supporting text carried by this example. Used as the
    /// tie-break when two examples share the same word: more text wins.
    pub fn evidence_len(&self) -> usize {
        self.decomposition.len() + self.explanation_zh.len()
    }
}

// ── Catalog entry ────────────────────────────────────────────────────────

/// A deduplicated root/prefix/suffix record, the durable output unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub root: String,
    #[serde(rename = "meaningZh")]
    pub meaning_zh: String,
    /// Most recently seen section banner at creation time; a loose
    /// topical label, not authoritative.
    pub section: String,
    /// Co-heading spelling variants, e.g. "ab" alongside "abs".
    pub aliases: Vec<String>,
    pub examples: Vec<Example>,
    pub tags: Vec<String>,
    pub confidence: f64,
}

impl Entry {
    /// Deterministic id for a (type, root) pair, stable across runs.
    pub fn stable_id(entry_type: EntryType, root: &str) -> String {
        let mut core = String::new();
        let mut pending_dash = false;
        for c in root.to_lowercase().chars() {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                if pending_dash && !core.is_empty() {
                    core.push('-');
                }
                pending_dash = false;
                core.push(c);
            } else {
                pending_dash = true;
            }
        }
        if core.is_empty() {
            core.push('x');
        }
        format!("{}-{}", entry_type.as_str(), core)
    }

    /// Merge an example under the longer-evidence-wins rule: a same-word
    /// example replaces the stored one only if it carries strictly more
    /// decomposition+explanation text.
    pub fn merge_example(&mut self, example: Example) {
        if let Some(prev) = self.examples.iter_mut().find(|e| e.word == example.word) {
            if example.evidence_len() > prev.evidence_len() {
                *prev = example;
            }
        } else {
            self.examples.push(example);
        }
    }
}

// ── JSON output format ───────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogMeta {
    pub source_file: String,
    pub entry_count: usize,
    pub example_count: usize,
    pub compact: bool,
    pub includes_raw_line: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Catalog {
    pub meta: CatalogMeta,
    pub entries: Vec<Entry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_type_from_marker() {
        assert_eq!(EntryType::infer("anti-"), EntryType::Prefix);
        assert_eq!(EntryType::infer("-ology"), EntryType::Suffix);
        assert_eq!(EntryType::infer("bio"), EntryType::Root);
    }

    #[test]
    fn test_stable_id_strips_markers() {
        assert_eq!(Entry::stable_id(EntryType::Prefix, "anti-"), "prefix-anti");
        assert_eq!(Entry::stable_id(EntryType::Suffix, "-ology"), "suffix-ology");
        assert_eq!(Entry::stable_id(EntryType::Root, "ced,cess"), "root-ced-cess");
    }

    #[test]
    fn test_stable_id_empty_core() {
        assert_eq!(Entry::stable_id(EntryType::Root, "---"), "root-x");
    }

    #[test]
    fn test_merge_example_longer_wins() {
        let mut entry = Entry {
            id: "prefix-anti".into(),
            entry_type: EntryType::Prefix,
            root: "anti-".into(),
            meaning_zh: String::new(),
            section: String::new(),
            aliases: vec![],
            examples: vec![],
            tags: vec![],
            confidence: 0.65,
        };
        entry.merge_example(Example {
            word: "antibody".into(),
            decomposition: "anti + body".into(),
            explanation_zh: "反体".into(),
            raw_line: None,
        });
        // Shorter evidence must not replace the stored example.
        entry.merge_example(Example {
            word: "antibody".into(),
            decomposition: String::new(),
            explanation_zh: "反体".into(),
            raw_line: None,
        });
        assert_eq!(entry.examples.len(), 1);
        assert_eq!(entry.examples[0].decomposition, "anti + body");
        // Longer evidence replaces it.
        entry.merge_example(Example {
            word: "antibody".into(),
            decomposition: "anti + body".into(),
            explanation_zh: "抗体, 身体对抗病原的蛋白".into(),
            raw_line: None,
        });
        assert_eq!(entry.examples.len(), 1);
        assert!(entry.examples[0].explanation_zh.contains("抗体"));
    }
}
