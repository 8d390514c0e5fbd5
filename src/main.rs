mod aggregate;
mod example;
mod heading;
mod normalize;
mod promote;
mod score;
mod stoplist;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use morpheme_types::{Catalog, CatalogMeta, EntryType};

const DEFAULT_INPUT: &str = "XDF.txt";
const DEFAULT_OUT: &str = "public/data/roots.json";

#[derive(Parser)]
#[command(
    name = "morpheme_extract",
    about = "English word-root/affix catalog extractor"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run extraction over converted text → roots.json
    Extract {
        /// Path to the converted source text (pdftotext -layout output)
        #[arg(default_value = DEFAULT_INPUT)]
        input: PathBuf,
        /// Output JSON path
        #[arg(long, default_value = DEFAULT_OUT)]
        out: PathBuf,
        /// Keep examples[].rawLine in the output (diagnostics)
        #[arg(long)]
        include_raw_line: bool,
    },
    /// Structural sanity check over a produced catalog
    Validate {
        /// Catalog JSON to check
        #[arg(default_value = DEFAULT_OUT)]
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Extract {
            input,
            out,
            include_raw_line,
        }) => run_extract(&input, &out, include_raw_line),
        Some(Command::Validate { file }) => run_validate(&file),
        // Default: extract with default paths
        None => run_extract(Path::new(DEFAULT_INPUT), Path::new(DEFAULT_OUT), false),
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  EXTRACT MODE: converted text → catalog JSON
// ═══════════════════════════════════════════════════════════════════════

fn run_extract(input: &Path, out: &Path, include_raw_line: bool) {
    eprintln!("Reading source text: {}", input.display());
    let text = std::fs::read_to_string(input).unwrap_or_else(|e| {
        eprintln!("Cannot read {}: {e}", input.display());
        eprintln!("Convert the source PDF first, e.g.: pdftotext -layout XDF.pdf XDF.txt");
        std::process::exit(1);
    });

    let (entries, summary) = aggregate::extract_entries(&text, include_raw_line);

    // ── Print statistics ───────────────────────────────────────────
    eprintln!("\n══════════════════════════════════════════");
    eprintln!("  CATALOG STATISTICS");
    eprintln!("══════════════════════════════════════════");

    let count_of = |t: EntryType| entries.iter().filter(|e| e.entry_type == t).count();
    eprintln!("\nBy type:");
    eprintln!("  prefix: {}", count_of(EntryType::Prefix));
    eprintln!("  root:   {}", count_of(EntryType::Root));
    eprintln!("  suffix: {}", count_of(EntryType::Suffix));

    let with_meaning = entries.iter().filter(|e| !e.meaning_zh.is_empty()).count();
    eprintln!("\nEntries:        {}", summary.entry_count);
    eprintln!("  with meaning: {with_meaning}");
    eprintln!("  recovered:    {}", summary.promoted_count);
    eprintln!("Examples:       {}", summary.example_count);

    let mut by_examples: Vec<_> = entries.iter().collect();
    by_examples.sort_by_key(|e| std::cmp::Reverse(e.examples.len()));
    eprintln!("\nTop entries by example count:");
    for entry in by_examples.iter().take(10) {
        eprintln!(
            "  {} ({}): {} examples",
            entry.root,
            entry.entry_type.as_str(),
            entry.examples.len()
        );
    }

    // ── Write catalog ──────────────────────────────────────────────
    let catalog = Catalog {
        meta: CatalogMeta {
            source_file: input
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string(),
            entry_count: summary.entry_count,
            example_count: summary.example_count,
            compact: true,
            includes_raw_line: include_raw_line,
        },
        entries,
    };

    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent).unwrap_or_else(|e| {
            eprintln!("Cannot create {}: {e}", parent.display());
            std::process::exit(1);
        });
    }
    let json = serde_json::to_string(&catalog).expect("JSON serialization failed");
    std::fs::write(out, &json).unwrap_or_else(|e| {
        eprintln!("Cannot write {}: {e}", out.display());
        std::process::exit(1);
    });

    eprintln!(
        "\nWrote {} with {} entries and {} examples",
        out.display(),
        catalog.meta.entry_count,
        catalog.meta.example_count
    );
}

// ═══════════════════════════════════════════════════════════════════════
//  VALIDATE MODE: structural completeness gate over a catalog file
// ═══════════════════════════════════════════════════════════════════════

const REQUIRED_FIELDS: &[&str] = &[
    "id", "type", "root", "meaningZh", "section", "aliases", "examples", "tags", "confidence",
];

fn run_validate(file: &Path) {
    let json = std::fs::read_to_string(file).unwrap_or_else(|e| {
        eprintln!("Cannot read {}: {e}", file.display());
        std::process::exit(1);
    });
    let value: serde_json::Value = serde_json::from_str(&json).unwrap_or_else(|e| {
        eprintln!("Cannot parse {}: {e}", file.display());
        std::process::exit(1);
    });

    match check_catalog(&value) {
        Ok((entry_count, example_count, completeness)) => {
            eprintln!("entryCount={entry_count}");
            eprintln!("exampleCount={example_count}");
            eprintln!("fieldCompleteness={completeness:.3}");
            eprintln!("validation passed");
        }
        Err(msg) => {
            eprintln!("validation failed: {msg}");
            std::process::exit(1);
        }
    }
}

/// Structural completeness: non-empty counters and at least 90% of
/// (entry × required-field) pairs present.
fn check_catalog(value: &serde_json::Value) -> Result<(usize, usize, f64), String> {
    let entries = value
        .get("entries")
        .and_then(|e| e.as_array())
        .ok_or("entries must be a list")?;

    let meta = value.get("meta").ok_or("meta missing")?;
    let entry_count = meta
        .get("entryCount")
        .and_then(|c| c.as_u64())
        .unwrap_or(0) as usize;
    let example_count = meta
        .get("exampleCount")
        .and_then(|c| c.as_u64())
        .unwrap_or(0) as usize;

    if entry_count == 0 {
        return Err("entryCount must be > 0".to_string());
    }
    if example_count == 0 {
        return Err("exampleCount must be > 0".to_string());
    }

    let all_fields = entries.len() * REQUIRED_FIELDS.len();
    let ok_fields: usize = entries
        .iter()
        .map(|e| {
            REQUIRED_FIELDS
                .iter()
                .filter(|f| e.get(**f).is_some())
                .count()
        })
        .sum();
    let completeness = if all_fields == 0 {
        0.0
    } else {
        ok_fields as f64 / all_fields as f64
    };

    if completeness < 0.9 {
        return Err(format!("field completeness {completeness:.3} below 0.9"));
    }
    Ok((entry_count, example_count, completeness))
}
