use std::collections::HashMap;
use std::sync::LazyLock;

use morpheme_types::{Entry, EntryType, Example};
use regex::Regex;

use crate::example::{derive_root, parse_example};
use crate::heading::parse_heading;
use crate::normalize::logical_lines;
use crate::promote::promote_recovered;
use crate::score::finalize;

/// Section banners: "第一部分 常用前缀" style group headers. Loose topical
/// labels only.
static RE_SECTION_BANNER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("常用前缀|常用后缀|词根").unwrap());

/// Summary counters reported alongside the entry list.
#[derive(Debug, Clone, Copy)]
pub struct Summary {
    pub entry_count: usize,
    pub example_count: usize,
    pub promoted_count: usize,
}

/// Semantic category tags from keyword matches in the meaning string.
fn pick_tags(meaning: &str) -> Vec<String> {
    let mut tags = Vec::new();
    if ["不", "无", "非"].iter().any(|k| meaning.contains(k)) {
        tags.push("否定".to_string());
    }
    if ["前", "后", "旁"].iter().any(|k| meaning.contains(k)) {
        tags.push("位置".to_string());
    }
    if ["共同", "一起"].iter().any(|k| meaning.contains(k)) {
        tags.push("共同".to_string());
    }
    tags
}

/// Single forward pass over the logical line sequence.
///
/// Headings open a root context; subsequent example lines attach to every
/// root in that context. Root-less examples are also recorded in a side
/// table keyed by their inferred decomposition root for the recovery pass.
pub struct Aggregator {
    current_section: String,
    current_roots: Vec<String>,
    entries_by_id: HashMap<String, Entry>,
    side_examples: HashMap<String, Vec<Example>>,
    keep_raw: bool,
}

impl Aggregator {
    pub fn new(keep_raw: bool) -> Self {
        Self {
            current_section: String::new(),
            current_roots: Vec::new(),
            entries_by_id: HashMap::new(),
            side_examples: HashMap::new(),
            keep_raw,
        }
    }

    fn section_label(&self) -> String {
        self.current_section.chars().take(120).collect()
    }

    pub fn process_line(&mut self, line: &str) {
        // Unmerged heading fragment: the normalizer's merge logic is the
        // only recovery for these; here they carry no usable signal.
        if line.contains('(') && !line.contains(')') && line.chars().count() < 80 {
            return;
        }

        if RE_SECTION_BANNER.is_match(line) && line.chars().count() <= 120 {
            self.current_section = line.to_string();
        }

        if let Some(heading) = parse_heading(line) {
            if !heading.tokens.is_empty() {
                self.apply_heading(heading.tokens, &heading.meaning);
                return;
            }
        }

        let Some(example) = parse_example(line, self.keep_raw) else {
            return;
        };
        self.apply_example(example);
    }

    fn apply_heading(&mut self, roots: Vec<String>, meaning: &str) {
        for root in &roots {
            let entry_type = EntryType::infer(root);
            let id = Entry::stable_id(entry_type, root);
            if let Some(existing) = self.entries_by_id.get_mut(&id) {
                if !meaning.is_empty() && existing.meaning_zh.is_empty() {
                    existing.meaning_zh = meaning.to_string();
                }
            } else {
                self.entries_by_id.insert(
                    id.clone(),
                    Entry {
                        id,
                        entry_type,
                        root: root.clone(),
                        meaning_zh: meaning.to_string(),
                        section: self.section_label(),
                        aliases: roots.iter().filter(|r| *r != root).cloned().collect(),
                        examples: Vec::new(),
                        tags: pick_tags(meaning),
                        confidence: if meaning.is_empty() { 0.75 } else { 0.9 },
                    },
                );
            }
        }
        self.current_roots = roots;
    }

    fn apply_example(&mut self, example: Example) {
        let derived = derive_root(&example);
        if let Some(root) = &derived {
            self.side_examples
                .entry(root.clone())
                .or_default()
                .push(example.clone());
        }

        let target_roots: Vec<String> = if !self.current_roots.is_empty() {
            self.current_roots.clone()
        } else if let Some(root) = derived {
            vec![root]
        } else {
            // No heading context and no inferable root: nothing to attach to.
            return;
        };

        let section = self.section_label();
        for root in &target_roots {
            let entry_type = EntryType::infer(root);
            let id = Entry::stable_id(entry_type, root);
            let entry = self
                .entries_by_id
                .entry(id.clone())
                .or_insert_with(|| Entry {
                    id,
                    entry_type,
                    root: root.clone(),
                    meaning_zh: String::new(),
                    section: section.clone(),
                    aliases: Vec::new(),
                    examples: Vec::new(),
                    tags: Vec::new(),
                    confidence: 0.65,
                });
            entry.merge_example(example.clone());
        }
    }
}

/// The whole transform: raw converted text in, sorted entry list plus
/// summary counters out. Pure, with no I/O and no fatal error path.
pub fn extract_entries(raw_text: &str, keep_raw: bool) -> (Vec<Entry>, Summary) {
    let mut agg = Aggregator::new(keep_raw);
    for line in logical_lines(raw_text) {
        agg.process_line(&line);
    }

    let section = agg.section_label();
    let promoted_count =
        promote_recovered(&agg.side_examples, &mut agg.entries_by_id, &section);

    let entries = finalize(agg.entries_by_id.into_values().collect());
    let summary = Summary {
        entry_count: entries.len(),
        example_count: entries.iter().map(|e| e.examples.len()).sum(),
        promoted_count,
    };
    (entries, summary)
}
