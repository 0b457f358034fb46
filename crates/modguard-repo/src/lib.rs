//! Repository adapters: discover a module directory, read and parse its files.
//!
//! This crate is allowed to do filesystem IO, read-only. It never writes into
//! the module it inspects.

#![forbid(unsafe_code)]

mod discover;
mod error;

use camino::Utf8Path;
use modguard_domain::model::{AnomalyKind, ModuleModel, ParsedFile, ScanAnomaly};
use modguard_types::RepoPath;
use rayon::prelude::*;
use std::collections::BTreeMap;

pub use discover::{Discovery, DiscoveryOptions, discover_sources};
pub use error::InputError;

/// Build the in-memory module model used by the rule engine.
///
/// Files are parsed in parallel; the result keeps discovery order (sorted by
/// name) so evaluation is reproducible.
pub fn build_module_model(root: &Utf8Path, opts: &DiscoveryOptions) -> anyhow::Result<ModuleModel> {
    let discovery = discover_sources(root, opts)?;
    tracing::info!(
        root = %root,
        files = discovery.files.len(),
        entries = discovery.entries.len(),
        "discovered module sources"
    );

    let files = discovery
        .files
        .par_iter()
        .map(|path| read_and_parse(root, path))
        .collect::<Result<Vec<ParsedFile>, InputError>>()?;

    let mut documents = BTreeMap::new();
    for name in &opts.documents {
        if !discovery.entries.contains(name.as_str()) || !root.join(name).is_file() {
            continue;
        }
        let (text, _) = read_text(&root.join(name))?;
        documents.insert(name.clone(), text);
    }

    Ok(ModuleModel {
        root: root.to_string(),
        files,
        entries: discovery.entries,
        documents,
    })
}

/// Read a file as text. Invalid UTF-8 is replaced with U+FFFD; the byte
/// offset of the first invalid sequence is returned alongside.
fn read_text(abs: &Utf8Path) -> Result<(String, Option<usize>), InputError> {
    let bytes = std::fs::read(abs).map_err(|source| InputError::Unreadable {
        path: abs.to_path_buf(),
        source,
    })?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok((text, None)),
        Err(e) => {
            let valid_up_to = e.utf8_error().valid_up_to();
            let text = String::from_utf8_lossy(e.as_bytes()).into_owned();
            Ok((text, Some(valid_up_to)))
        }
    }
}

/// 1-based line and byte column of `offset` in `text`.
fn line_col(text: &str, offset: usize) -> (u32, u32) {
    let before = &text[..offset];
    let line = before.matches('\n').count() + 1;
    let col = before.rfind('\n').map_or(offset, |nl| offset - nl - 1) + 1;
    (line as u32, col as u32)
}

fn read_and_parse(root: &Utf8Path, path: &RepoPath) -> Result<ParsedFile, InputError> {
    let abs = root.join(path.as_str());
    let (text, invalid_at) = read_text(&abs)?;

    // Lossy decoding keeps every byte before the first bad sequence, so the
    // offset is still valid in the decoded text.
    let encoding = invalid_at.map(|offset| {
        let (line, col) = line_col(&text, offset);
        tracing::warn!(file = %path, line, "invalid UTF-8, decoded lossily");
        ScanAnomaly {
            kind: AnomalyKind::InvalidEncoding,
            line,
            col,
            detail: format!("invalid UTF-8 at byte {offset}; replaced with U+FFFD"),
        }
    });

    let mut parsed = modguard_parser::parse_file(path.clone(), text);
    if let Some(anomaly) = encoding {
        parsed.anomalies.insert(0, anomaly);
    }
    tracing::debug!(
        file = %path,
        declarations = parsed.declarations.len(),
        anomalies = parsed.anomalies.len(),
        "parsed"
    );
    Ok(parsed)
}
