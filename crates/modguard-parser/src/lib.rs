//! Text in, facts out.
//!
//! [`parse_file`] runs the lexical scanner and the declaration extractor over
//! one file's text. Nothing here fails: problems in the input come back as
//! [`ScanAnomaly`] values on the [`ParsedFile`].

#![forbid(unsafe_code)]

mod extract;
mod lines;
mod scan;

pub use extract::{Extracted, extract};
pub use lines::LineIndex;
pub use scan::{ScanOutput, scan};

use modguard_domain::model::{ParsedFile, ScanAnomaly, SourceFile};
use modguard_types::RepoPath;

/// Scan and extract one configuration file.
pub fn parse_file(path: RepoPath, raw: String) -> ParsedFile {
    let scanned = scan(&raw);
    let lines = LineIndex::new(&raw);
    let extracted = extract(&path, &scanned, &lines);

    let mut anomalies: Vec<ScanAnomaly> = scanned.anomalies.clone();
    anomalies.extend(extracted.anomalies);
    anomalies.sort_by_key(|a| (a.line, a.col));

    ParsedFile {
        source: SourceFile {
            path,
            raw,
            stripped: scanned.stripped,
        },
        declarations: extracted.declarations,
        anomalies,
    }
}
