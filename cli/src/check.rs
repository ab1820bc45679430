use std::path::PathBuf;

use lingo::{Converter, Error, Freshness};

fn ok_label(no_color: bool) -> &'static str {
    if no_color { "ok" } else { "\x1b[32mok\x1b[0m" }
}

fn fail_label(freshness: Freshness, no_color: bool) -> String {
    let label = match freshness {
        Freshness::Stale => "stale",
        Freshness::Missing => "missing",
        Freshness::Orphaned => "orphaned",
        Freshness::UpToDate | Freshness::Empty => "ok",
    };
    if no_color {
        label.to_uppercase()
    } else {
        format!("\x1b[31m{}\x1b[0m", label.to_uppercase())
    }
}

/// Check each document's output. Returns the exit code: 0 when everything is
/// current, 1 otherwise. Unreadable or unparsable documents abort the check.
pub fn run_check(converter: &Converter, documents: &[PathBuf], no_color: bool) -> Result<i32, Error> {
    let mut failed = 0;

    for document in documents {
        let freshness = converter.check(document)?;
        let output = converter.target().output_path(document);
        if freshness == Freshness::Empty {
            continue;
        }
        if freshness.is_ok() {
            println!("{} {}", ok_label(no_color), output.display());
        } else {
            failed += 1;
            println!("{} {}", fail_label(freshness, no_color), output.display());
        }
    }

    if failed == 0 {
        eprintln!("{} document(s) checked, all outputs up to date", documents.len());
        Ok(0)
    } else {
        eprintln!(
            "{} document(s) checked, {} output(s) out of date; run `lingo convert`",
            documents.len(),
            failed
        );
        Ok(1)
    }
}
