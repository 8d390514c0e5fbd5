use std::collections::HashMap;
use std::sync::LazyLock;

use morpheme_types::{Entry, EntryType, Example};
use regex::Regex;

use crate::score::distinct_explanations;

/// Minimum number of root-less examples sharing a decomposition root
/// before the root is considered real.
const PROMOTE_THRESHOLD: usize = 4;

/// Promoted roots must look like a clean prefix; anything else in the side
/// table is decomposition noise.
static RE_CLEAN_ROOT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z]{1,10}-$").unwrap());

/// Recovery pass: promote decomposition-derived roots that recur often
/// enough into full entries, even though no heading ever introduced them.
///
/// Returns the number of entries created.
pub fn promote_recovered(
    side_examples: &HashMap<String, Vec<Example>>,
    entries_by_id: &mut HashMap<String, Entry>,
    section: &str,
) -> usize {
    let mut promoted = 0;

    for (root, ex_list) in side_examples {
        if ex_list.len() < PROMOTE_THRESHOLD {
            continue;
        }
        if !RE_CLEAN_ROOT.is_match(root) {
            continue;
        }
        let entry_type = EntryType::infer(root);
        let id = Entry::stable_id(entry_type, root);
        if entries_by_id.contains_key(&id) {
            continue;
        }

        // Dedupe by word (longer evidence wins), then sort for determinism.
        let mut by_word: HashMap<&str, &Example> = HashMap::new();
        for ex in ex_list {
            let replace = match by_word.get(ex.word.as_str()) {
                Some(prev) => ex.evidence_len() > prev.evidence_len(),
                None => true,
            };
            if replace {
                by_word.insert(&ex.word, ex);
            }
        }
        let mut examples: Vec<Example> = by_word.into_values().cloned().collect();
        examples.sort_by(|a, b| a.word.cmp(&b.word));

        let meanings = distinct_explanations(&examples);
        let meaning_zh = if meanings.is_empty() {
            String::new()
        } else {
            format!("自动聚合义项: {}", meanings.join("；"))
        };

        entries_by_id.insert(
            id.clone(),
            Entry {
                id,
                entry_type,
                root: root.clone(),
                meaning_zh,
                section: section.to_string(),
                aliases: Vec::new(),
                examples,
                tags: Vec::new(),
                confidence: 0.72,
            },
        );
        promoted += 1;
    }

    promoted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ex(word: &str, expl: &str) -> Example {
        Example {
            word: word.into(),
            decomposition: "bio + x".into(),
            explanation_zh: expl.into(),
            raw_line: None,
        }
    }

    #[test]
    fn test_promotes_recurring_root() {
        let mut side = HashMap::new();
        side.insert(
            "bio-".to_string(),
            vec![
                ex("biology", "生物学"),
                ex("biography", "传记"),
                ex("biosphere", "生物圈"),
                ex("biotic", "生物的"),
            ],
        );
        let mut entries = HashMap::new();
        let n = promote_recovered(&side, &mut entries, "词根部分");
        assert_eq!(n, 1);
        let entry = &entries["prefix-bio"];
        assert_eq!(entry.root, "bio-");
        assert_eq!(entry.confidence, 0.72);
        assert!(entry.meaning_zh.starts_with("自动聚合义项: "));
        // Word-sorted for determinism.
        assert_eq!(entry.examples[0].word, "biography");
    }

    #[test]
    fn test_below_threshold_not_promoted() {
        let mut side = HashMap::new();
        side.insert(
            "bio-".to_string(),
            vec![ex("biology", "生物学"), ex("biotic", "生物的")],
        );
        let mut entries = HashMap::new();
        assert_eq!(promote_recovered(&side, &mut entries, ""), 0);
        assert!(entries.is_empty());
    }

    #[test]
    fn test_noise_roots_rejected() {
        let mut side = HashMap::new();
        for root in ["-bio", "bio", "b-io-", "verylongrootx-"] {
            side.insert(
                root.to_string(),
                vec![ex("a1", "一"), ex("a2", "二"), ex("a3", "三"), ex("a4", "四")],
            );
        }
        let mut entries = HashMap::new();
        assert_eq!(promote_recovered(&side, &mut entries, ""), 0);
    }

    #[test]
    fn test_existing_entry_not_overwritten() {
        let mut side = HashMap::new();
        side.insert(
            "bio-".to_string(),
            vec![
                ex("biology", "生物学"),
                ex("biography", "传记"),
                ex("biosphere", "生物圈"),
                ex("biotic", "生物的"),
            ],
        );
        let mut entries = HashMap::new();
        entries.insert(
            "prefix-bio".to_string(),
            Entry {
                id: "prefix-bio".into(),
                entry_type: EntryType::Prefix,
                root: "bio-".into(),
                meaning_zh: "生命".into(),
                section: String::new(),
                aliases: vec![],
                examples: vec![],
                tags: vec![],
                confidence: 0.9,
            },
        );
        assert_eq!(promote_recovered(&side, &mut entries, ""), 0);
        assert_eq!(entries["prefix-bio"].meaning_zh, "生命");
    }
}
