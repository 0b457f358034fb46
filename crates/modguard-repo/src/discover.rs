use crate::error::InputError;
use anyhow::Context;
use camino::Utf8Path;
use globset::{Glob, GlobSet, GlobSetBuilder};
use modguard_types::RepoPath;
use std::collections::BTreeSet;
use walkdir::WalkDir;

/// What to pick up from the input directory.
#[derive(Clone, Debug)]
pub struct DiscoveryOptions {
    /// File extension without the dot.
    pub extension: String,
    /// Globs matched against file names; matches are not scanned.
    pub exclude: Vec<String>,
    /// Top-level text files read verbatim when present (the README).
    pub documents: Vec<String>,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            extension: "tf".to_string(),
            exclude: Vec::new(),
            documents: vec!["README.md".to_string()],
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Discovery {
    /// Configuration files to scan, sorted by name.
    pub files: Vec<RepoPath>,
    /// Every top-level entry (files and directories), excluded or not.
    pub entries: BTreeSet<String>,
}

/// List the top level of `root`.
///
/// Modules are flat: nested directories such as `examples/` are recorded as
/// entries but never descended into.
pub fn discover_sources(root: &Utf8Path, opts: &DiscoveryOptions) -> anyhow::Result<Discovery> {
    let meta = match std::fs::metadata(root) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(InputError::NotFound(root.to_path_buf()).into());
        }
        Err(source) => {
            return Err(InputError::Unreadable {
                path: root.to_path_buf(),
                source,
            }
            .into());
        }
    };
    if !meta.is_dir() {
        return Err(InputError::NotADirectory(root.to_path_buf()).into());
    }

    let exclude = build_globset(&opts.exclude).context("compile exclude globset")?;

    let mut out = Discovery::default();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let path = e
                .path()
                .and_then(Utf8Path::from_path)
                .unwrap_or(root)
                .to_path_buf();
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("filesystem loop"));
            InputError::Unreadable { path, source }
        })?;

        // Non-UTF-8 names cannot be reported stably; skip them.
        let Some(name) = entry.file_name().to_str() else {
            tracing::debug!(path = %entry.path().display(), "skipping non-utf8 entry");
            continue;
        };
        out.entries.insert(name.to_string());

        if !entry.file_type().is_file() {
            continue;
        }
        let path = RepoPath::new(name);
        if path.extension() != Some(opts.extension.as_str()) {
            continue;
        }
        if exclude.is_match(path.file_name()) {
            tracing::debug!(file = name, "excluded");
            continue;
        }
        out.files.push(path);
    }

    if out.files.is_empty() {
        return Err(InputError::NoConfigFiles {
            root: root.to_path_buf(),
            extension: opts.extension.clone(),
        }
        .into());
    }

    Ok(out)
}

fn build_globset(patterns: &[String]) -> anyhow::Result<GlobSet> {
    let mut b = GlobSetBuilder::new();
    for p in patterns {
        b.add(Glob::new(p)?);
    }
    Ok(b.build()?)
}
