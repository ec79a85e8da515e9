use crate::image::{encode_asset, AssetEntry, DataUri};
use anyhow::Result;
use log::{debug, info};

const QUOTES: [char; 2] = ['"', '\''];

/// How many quoted references to one asset were rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub relative_path: String,
    pub occurrences: usize,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InlineReport {
    /// One entry per asset, in processing order
    pub replacements: Vec<Replacement>,
}

impl InlineReport {
    /// Assets referenced at least once
    pub fn substituted_assets(&self) -> usize {
        self.replacements.iter().filter(|r| r.occurrences > 0).count()
    }

    pub fn total_occurrences(&self) -> usize {
        self.replacements.iter().map(|r| r.occurrences).sum()
    }
}

/// Encode every asset and swap its quoted path in `document` for the data URI.
///
/// Assets are applied in order, each one against the output of the previous.
/// Unreferenced assets are still read, so an unreadable file aborts the run.
pub fn inline(mut document: String, assets: &[AssetEntry]) -> Result<(String, InlineReport)> {
    let mut report = InlineReport::default();
    let total = assets.len();

    for (i, asset) in assets.iter().enumerate() {
        info!("  [{}/{}] {}", i + 1, total, asset.relative_path);

        let uri = encode_asset(&asset.absolute_path)?;
        let (rewritten, occurrences) = substitute(document, &asset.relative_path, &uri);
        document = rewritten;

        debug!("{}: {} reference(s) replaced", asset.relative_path, occurrences);
        report.replacements.push(Replacement {
            relative_path: asset.relative_path.clone(),
            occurrences,
        });
    }

    Ok((document, report))
}

/// Replace `"path"` and `'path'` anywhere in the text, keeping the quote style.
///
/// Plain text replacement with no notion of tags or attributes, so a quoted
/// path inside a comment or script is rewritten too.
pub fn substitute(mut document: String, relative_path: &str, uri: &DataUri) -> (String, usize) {
    let mut occurrences = 0;

    for quote in QUOTES {
        let needle = format!("{quote}{relative_path}{quote}");
        let count = document.matches(needle.as_str()).count();
        if count == 0 {
            continue;
        }
        occurrences += count;
        document = document.replace(&needle, &format!("{quote}{uri}{quote}"));
    }

    (document, occurrences)
}
