use anyhow::{Context, Result, bail};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// One input PDF. The title doubles as the document's identifier: it names
/// the report section and keys resume lookups, so it must be unique per run.
#[derive(Debug, Clone)]
pub struct Document {
    pub title: String,
    pub path: PathBuf,
}

/// Raw bytes handed opaque to the gateway; nothing here parses PDF structure.
#[derive(Debug, Clone)]
pub struct DocumentContent {
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Unreadable {
        path: String,
        source: std::io::Error,
    },
    #[error("{path} is empty")]
    Empty { path: String },
}

/// Enumerate `*.pdf` files in `dir`, sorted by filename so repeated runs see
/// the same order. Missing directory, empty set, and duplicate titles are
/// fatal setup errors.
pub fn list_documents(dir: &Path) -> Result<Vec<Document>> {
    if !dir.is_dir() {
        bail!("PDF directory not found: {}", dir.display());
    }

    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("reading directory: {}", dir.display()))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .and_then(|s| s.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        })
        .collect();
    paths.sort();

    if paths.is_empty() {
        bail!("no PDF files found in {}", dir.display());
    }

    let mut seen = BTreeSet::new();
    let mut docs = Vec::with_capacity(paths.len());
    for path in paths {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("untitled");
        let title = clean_title(stem);
        if !seen.insert(title.clone()) {
            bail!("duplicate document title after normalization: {title}");
        }
        docs.push(Document { title, path });
    }
    Ok(docs)
}

/// Collapse whitespace runs in a filename stem into single spaces.
pub fn clean_title(stem: &str) -> String {
    stem.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn read_content(doc: &Document) -> Result<DocumentContent, IngestError> {
    let bytes = std::fs::read(&doc.path).map_err(|source| IngestError::Unreadable {
        path: doc.path.display().to_string(),
        source,
    })?;
    if bytes.is_empty() {
        return Err(IngestError::Empty {
            path: doc.path.display().to_string(),
        });
    }
    Ok(DocumentContent { bytes })
}
