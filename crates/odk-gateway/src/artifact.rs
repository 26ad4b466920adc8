use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use odk_schemas::PurchaseOrder;

/// Write the document to `<dir>/PO_<po_number>.json` as pretty JSON, creating
/// the directory if needed. Runs before the upstream POST so the document
/// survives a transport failure; a resubmission of the same number overwrites
/// the previous artifact with identical content.
pub fn write_po_artifact(dir: &Path, po: &PurchaseOrder) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create exports dir: {}", dir.display()))?;

    let path = dir.join(format!("PO_{}.json", po.po_number));
    let json = serde_json::to_string_pretty(po).context("purchase order serialize failed")?;
    fs::write(&path, json)
        .with_context(|| format!("failed to write artifact: {}", path.display()))?;
    Ok(path)
}
