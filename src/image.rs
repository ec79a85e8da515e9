use crate::mime::classify_mime_type;
use anyhow::{Context, Result};
use base64::{engine::general_purpose, Engine as _};
use log::{trace, warn};
use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// An image found under the asset directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetEntry {
    /// Path from the project root with `/` separators, as the page refers to it
    pub relative_path: String,
    /// Where the bytes are read from
    pub absolute_path: PathBuf,
}

/// `data:<mime>;base64,<payload>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri(String);

impl DataUri {
    pub fn new(mime: &str, bytes: &[u8]) -> Self {
        Self(format!(
            "data:{};base64,{}",
            mime,
            general_purpose::STANDARD.encode(bytes)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read an asset and encode it as a data URI.
pub fn encode_asset(path: &Path) -> Result<DataUri> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read asset: {}", path.display()))?;
    Ok(DataUri::new(&classify_mime_type(path), &bytes))
}

/// Recursively collect inlinable files under `asset_root`, sorted by relative path.
///
/// Dotfiles are skipped, as is anything whose lowercased extension is not in
/// `extensions`. A missing asset directory yields no assets.
pub fn discover_assets(
    asset_root: &Path,
    project_root: &Path,
    extensions: &[String],
) -> Result<Vec<AssetEntry>> {
    if !asset_root.exists() {
        warn!("Asset directory not found: {}", asset_root.display());
        return Ok(Vec::new());
    }

    let mut assets = Vec::new();

    for entry in WalkDir::new(asset_root) {
        let entry = entry
            .with_context(|| format!("Failed to scan asset directory: {}", asset_root.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if name.starts_with('.') {
            trace!("Skipping hidden file {}", path.display());
            continue;
        }
        if !has_extension(path, extensions) {
            trace!("Skipping non-image file {}", path.display());
            continue;
        }

        assets.push(AssetEntry {
            relative_path: relative_path(path, project_root)?,
            absolute_path: path.to_path_buf(),
        });
    }

    assets.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    Ok(assets)
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| extensions.iter().any(|e| *e == ext))
}

/// `path` relative to `root`, joined with forward slashes.
fn relative_path(path: &Path, root: &Path) -> Result<String> {
    let rel = match path.strip_prefix(root) {
        Ok(rel) => rel.to_path_buf(),
        Err(_) => {
            // Mixed forms like `assets/x.png` against `.` only line up once absolute
            let abs_path = std::path::absolute(path)?;
            let abs_root = std::path::absolute(root)?;
            abs_path
                .strip_prefix(&abs_root)
                .with_context(|| {
                    format!(
                        "Asset {} is outside the project root {}",
                        path.display(),
                        root.display()
                    )
                })?
                .to_path_buf()
        }
    };

    let parts: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    Ok(parts.join("/"))
}
