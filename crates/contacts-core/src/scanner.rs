//! Discovery of card files to import

use crate::error::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions recognized as card files (compared case-insensitively)
const CARD_EXTENSIONS: &[&str] = &["vcf", "vcard"];

/// Collect card files from a mix of files and directories.
///
/// Files given directly are kept whatever their extension. Directories are
/// walked recursively for `.vcf` / `.vcard` files, sorted by path so imports
/// run in a stable order.
pub fn find_cards<P: AsRef<Path>>(roots: &[P]) -> Result<Vec<PathBuf>> {
    let mut cards = Vec::new();

    for root in roots {
        let root = root.as_ref();

        if !root.is_dir() {
            cards.push(root.to_path_buf());
            continue;
        }

        let mut found = Vec::new();
        for entry in WalkDir::new(root).follow_links(true) {
            let entry = entry?;
            if entry.file_type().is_file() && is_card_file(entry.path()) {
                found.push(entry.into_path());
            }
        }
        found.sort();
        cards.extend(found);
    }

    Ok(cards)
}

fn is_card_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            CARD_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}
