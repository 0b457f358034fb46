//! Fact Extractor: top-level declaration headers and their brace-balanced
//! bodies, found on the scanner's stripped view.

use crate::lines::LineIndex;
use crate::scan::ScanOutput;
use modguard_domain::model::{
    AnomalyKind, Attribute, Block, Body, Declaration, DeclarationKind, LineSpan, ScanAnomaly,
};
use modguard_types::RepoPath;
use regex::Regex;
use std::sync::LazyLock;

static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?m)^[ \t]*(resource|data|variable|output|locals|module|provider|terraform)((?:[ \t]+(?:"[^"\n]*"|[A-Za-z_][A-Za-z0-9_-]*))*)[ \t]*\{"#,
    )
    .expect("static regex")
});
static LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""([^"\n]*)"|([A-Za-z_][A-Za-z0-9_-]*)"#).expect("static regex")
});
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\A([A-Za-z_][A-Za-z0-9_-]*)[ \t]*=").expect("static regex")
});
static NESTED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\A([A-Za-z_][A-Za-z0-9_-]*)((?:[ \t]+(?:"[^"\n]*"|[A-Za-z_][A-Za-z0-9_-]*))*)[ \t]*\{"#,
    )
    .expect("static regex")
});

#[derive(Debug, Default)]
pub struct Extracted {
    pub declarations: Vec<Declaration>,
    pub anomalies: Vec<ScanAnomaly>,
}

struct Extractor<'a> {
    scan: &'a ScanOutput,
    lines: &'a LineIndex,
}

fn expected_labels(keyword: &str) -> usize {
    match keyword {
        "resource" | "data" => 2,
        "locals" | "terraform" => 0,
        _ => 1,
    }
}

pub fn extract(path: &RepoPath, scan: &ScanOutput, lines: &LineIndex) -> Extracted {
    let ex = Extractor { scan, lines };
    let mut out = Extracted::default();
    let stripped = scan.stripped.as_str();

    // Matches inside an already extracted block are skipped. After an
    // unclosed header the offset is not advanced, so later headers are still
    // found.
    let mut resume = 0usize;
    for caps in HEADER.captures_iter(stripped) {
        let whole = caps.get(0).expect("group 0 always present");
        let keyword_match = caps.get(1).expect("keyword group always present");
        if whole.start() < resume {
            continue;
        }
        let keyword = keyword_match.as_str();
        let header_at = keyword_match.start();
        let open = whole.end() - 1;
        let labels = caps
            .get(2)
            .map(|m| ex.labels(m.range()))
            .unwrap_or_default();
        let (line, col) = lines.line_col(header_at);

        let Some(close) = find_close(stripped, open, stripped.len()) else {
            out.anomalies.push(ScanAnomaly {
                kind: AnomalyKind::UnclosedBlock,
                line,
                col,
                detail: format!("`{keyword}` block is never closed; declaration skipped"),
            });
            continue;
        };
        resume = close + 1;

        let expected = expected_labels(keyword);
        if labels.len() != expected {
            out.anomalies.push(ScanAnomaly {
                kind: AnomalyKind::MalformedHeader,
                line,
                col,
                detail: format!(
                    "`{keyword}` expects {expected} label(s), found {}; declaration skipped",
                    labels.len()
                ),
            });
            continue;
        }

        let body = ex.body(open + 1, close);
        let span = LineSpan {
            start: line,
            end: lines.line(close),
        };
        let mut labels = labels.into_iter();
        let mut label = || labels.next().unwrap_or_default();
        let mut push = |kind, type_name: Option<String>, name: String, body: Body| {
            out.declarations.push(Declaration {
                kind,
                type_name,
                name,
                file: path.clone(),
                span,
                body,
            });
        };

        match keyword {
            "resource" => push(DeclarationKind::Resource, Some(label()), label(), body),
            "data" => push(DeclarationKind::DataSource, Some(label()), label(), body),
            "variable" => push(DeclarationKind::Variable, None, label(), body),
            "output" => push(DeclarationKind::Output, None, label(), body),
            "module" => push(DeclarationKind::Module, None, label(), body),
            "provider" => push(DeclarationKind::Provider, None, label(), body),
            "terraform" => push(DeclarationKind::Settings, None, "terraform".to_string(), body),
            _ => {
                // locals: one declaration per attribute.
                for attr in body.attributes {
                    let line = attr.line;
                    let name = attr.name.clone();
                    out.declarations.push(Declaration {
                        kind: DeclarationKind::Local,
                        type_name: None,
                        name,
                        file: path.clone(),
                        span: LineSpan {
                            start: line,
                            end: line,
                        },
                        body: Body {
                            attributes: vec![attr],
                            blocks: Vec::new(),
                        },
                    });
                }
            }
        }
    }

    out
}

/// Offset of the `}` matching the `{` at `open`, searching below `limit`.
fn find_close(stripped: &str, open: usize, limit: usize) -> Option<usize> {
    let bytes = stripped.as_bytes();
    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate().take(limit).skip(open) {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

impl Extractor<'_> {
    fn labels(&self, range: std::ops::Range<usize>) -> Vec<String> {
        let text = &self.scan.uncommented[range];
        LABEL
            .captures_iter(text)
            .map(|c| {
                c.get(1)
                    .or_else(|| c.get(2))
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default()
            })
            .collect()
    }

    /// Parse `name = value` attributes and nested blocks in `[start, end)`.
    fn body(&self, start: usize, end: usize) -> Body {
        let stripped = self.scan.stripped.as_str();
        let bytes = stripped.as_bytes();
        let mut body = Body::default();
        let mut p = start;

        while p < end {
            if bytes[p].is_ascii_whitespace() || bytes[p] == b',' || bytes[p] == b';' {
                p += 1;
                continue;
            }
            let rest = &stripped[p..end];

            if let Some(c) = ATTRIBUTE.captures(rest) {
                let matched = c.get(0).expect("group 0 always present");
                let after_eq = p + matched.end();
                // `==` starts a comparison, not an assignment.
                if bytes.get(after_eq) != Some(&b'=') {
                    let value_start = skip_blanks(bytes, after_eq, end);
                    let value_end = self.value_end(value_start, end);
                    body.attributes.push(Attribute {
                        name: c[1].to_string(),
                        value: self.scan.uncommented[value_start..value_end].trim().to_string(),
                        expression: self.scan.expressions[value_start..value_end]
                            .trim()
                            .to_string(),
                        line: self.lines.line(p),
                    });
                    p = value_end.max(p + 1);
                    continue;
                }
            }

            if let Some(c) = NESTED_BLOCK.captures(rest) {
                let matched = c.get(0).expect("group 0 always present");
                let open = p + matched.end() - 1;
                if let Some(close) = find_close(stripped, open, end) {
                    let labels = c
                        .get(2)
                        .map(|m| self.labels(p + m.start()..p + m.end()))
                        .unwrap_or_default();
                    body.blocks.push(Block {
                        kind: c[1].to_string(),
                        labels,
                        body: self.body(open + 1, close),
                        span: LineSpan {
                            start: self.lines.line(p),
                            end: self.lines.line(close),
                        },
                    });
                    p = close + 1;
                    continue;
                }
            }

            // Unrecognized text: skip the rest of the line.
            p = bytes[p..end]
                .iter()
                .position(|&b| b == b'\n')
                .map_or(end, |q| p + q + 1);
        }

        body
    }

    /// End of an attribute value starting at `start`: the first newline at
    /// bracket depth zero, or an unmatched closer. Heredocs are skipped whole.
    fn value_end(&self, start: usize, limit: usize) -> usize {
        let bytes = self.scan.stripped.as_bytes();
        let mut depth = 0usize;
        let mut i = start;
        while i < limit {
            if let Some(h) = self.scan.heredocs.iter().find(|h| h.start == i) {
                i = h.end.min(limit);
                continue;
            }
            match bytes[i] {
                b'{' | b'[' | b'(' => depth += 1,
                b'}' | b']' | b')' => {
                    if depth == 0 {
                        return i;
                    }
                    depth -= 1;
                }
                b'\n' if depth == 0 => return i,
                _ => {}
            }
            i += 1;
        }
        limit
    }
}

fn skip_blanks(bytes: &[u8], mut p: usize, end: usize) -> usize {
    while p < end && matches!(bytes[p], b' ' | b'\t') {
        p += 1;
    }
    p
}
