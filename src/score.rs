use morpheme_types::{Entry, Example};

/// Up to 2 distinct, non-empty explanation strings, in example order.
pub fn distinct_explanations(examples: &[Example]) -> Vec<String> {
    let mut meanings: Vec<String> = Vec::new();
    for ex in examples {
        let m = ex.explanation_zh.trim();
        if !m.is_empty() && !meanings.iter().any(|seen| seen == m) {
            meanings.push(m.to_string());
        }
        if meanings.len() >= 2 {
            break;
        }
    }
    meanings
}

/// Final scoring pass: back-fill meanings from example explanations and
/// raise confidence where corroborating evidence exists. Confidence is
/// only ever raised here, and capped below 1.0.
pub fn finalize(mut entries: Vec<Entry>) -> Vec<Entry> {
    entries.sort_by(|a, b| {
        (a.entry_type.as_str(), a.root.as_str()).cmp(&(b.entry_type.as_str(), b.root.as_str()))
    });

    for entry in &mut entries {
        if entry.meaning_zh.is_empty() && !entry.examples.is_empty() {
            let meanings = distinct_explanations(&entry.examples);
            if !meanings.is_empty() {
                entry.meaning_zh = format!("例词义项: {}", meanings.join("；"));
            }
        }
        if !entry.examples.is_empty() && !entry.meaning_zh.is_empty() {
            entry.confidence = entry.confidence.max(0.92);
        } else if !entry.examples.is_empty() {
            entry.confidence = entry.confidence.max(0.7);
        }
        entry.confidence = (entry.confidence.min(0.99) * 100.0).round() / 100.0;
    }

    entries
}
