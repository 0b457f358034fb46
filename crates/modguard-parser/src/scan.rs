//! Lexical Scanner.
//!
//! One forward pass over the raw text. Produces three offset-preserving views
//! of the input plus the list of balance anomalies:
//!
//! - `uncommented`: comments blanked with spaces.
//! - `expressions`: additionally, literal string and heredoc text blanked with
//!   `_`; `${ ... }` interpolations stay visible.
//! - `stripped`: everything between the outermost quotes blanked, heredoc
//!   bodies blanked. Only structure is left.
//!
//! Newlines are never blanked, so line numbers agree across all views.
//! Scanning never stops early: every anomaly in the file is reported.

use crate::lines::LineIndex;
use modguard_domain::model::{AnomalyKind, ScanAnomaly};
use std::ops::Range;

#[derive(Clone, Debug, Default)]
pub struct ScanOutput {
    pub stripped: String,
    pub expressions: String,
    pub uncommented: String,
    /// Byte ranges from `<<` through the terminator line of each heredoc.
    pub heredocs: Vec<Range<usize>>,
    pub anomalies: Vec<ScanAnomaly>,
}

#[derive(Clone, Copy, Debug)]
enum Frame {
    Delim { open: u8, offset: usize },
    Str { offset: usize },
    Interp { offset: usize },
}

fn opener_for(closer: u8) -> u8 {
    match closer {
        b'}' => b'{',
        b']' => b'[',
        _ => b'(',
    }
}

fn closer_for(opener: u8) -> u8 {
    match opener {
        b'{' => b'}',
        b'[' => b']',
        _ => b')',
    }
}

fn blank(buf: &mut [u8], range: Range<usize>, fill: u8) {
    for b in &mut buf[range] {
        if *b != b'\n' {
            *b = fill;
        }
    }
}

struct Scanner<'a> {
    src: &'a [u8],
    lines: LineIndex,
    stripped: Vec<u8>,
    expressions: Vec<u8>,
    uncommented: Vec<u8>,
    heredocs: Vec<Range<usize>>,
    anomalies: Vec<(usize, ScanAnomaly)>,
    stack: Vec<Frame>,
    str_depth: usize,
}

pub fn scan(raw: &str) -> ScanOutput {
    let mut s = Scanner {
        src: raw.as_bytes(),
        lines: LineIndex::new(raw),
        stripped: raw.as_bytes().to_vec(),
        expressions: raw.as_bytes().to_vec(),
        uncommented: raw.as_bytes().to_vec(),
        heredocs: Vec::new(),
        anomalies: Vec::new(),
        stack: Vec::new(),
        str_depth: 0,
    };
    s.run();
    s.finish()
}

impl Scanner<'_> {
    fn report(&mut self, kind: AnomalyKind, offset: usize, detail: String) {
        let (line, col) = self.lines.line_col(offset);
        self.anomalies.push((
            offset,
            ScanAnomaly {
                kind,
                line,
                col,
                detail,
            },
        ));
    }

    fn line_of(&self, offset: usize) -> u32 {
        self.lines.line(offset)
    }

    fn run(&mut self) {
        let mut i = 0;
        while i < self.src.len() {
            let depth_before = self.str_depth;
            let in_string = matches!(self.stack.last(), Some(Frame::Str { .. }));
            let next = if in_string {
                self.string_step(i)
            } else {
                self.code_step(i)
            };
            if depth_before > 0 && self.str_depth > 0 {
                blank(&mut self.stripped, i..next, b'_');
            }
            i = next;
        }
        self.unwind_at_eof();
    }

    /// Inside a quoted string. Returns the next offset to process.
    fn string_step(&mut self, i: usize) -> usize {
        let src = self.src;
        match src[i] {
            b'\n' => {
                if let Some(Frame::Str { offset }) = self.stack.last().copied() {
                    self.report(
                        AnomalyKind::UnterminatedString,
                        offset,
                        "string literal is not closed before end of line".to_string(),
                    );
                }
                // Recover at the nearest enclosing delimiter.
                while let Some(frame) = self.stack.last() {
                    match frame {
                        Frame::Str { .. } => self.str_depth -= 1,
                        Frame::Interp { .. } => {}
                        Frame::Delim { .. } => break,
                    }
                    self.stack.pop();
                }
                // The newline itself is handled in code mode.
                i
            }
            b'\\' => {
                let end = if i + 1 < src.len() && src[i + 1] != b'\n' {
                    i + 2
                } else {
                    i + 1
                };
                blank(&mut self.expressions, i..end, b'_');
                end
            }
            b'"' => {
                self.stack.pop();
                self.str_depth -= 1;
                i + 1
            }
            b'$' | b'%' if src.get(i + 1) == Some(&src[i]) && src.get(i + 2) == Some(&b'{') => {
                // `$${` and `%%{` are literal text.
                blank(&mut self.expressions, i..i + 3, b'_');
                i + 3
            }
            b'$' | b'%' if src.get(i + 1) == Some(&b'{') => {
                self.stack.push(Frame::Interp { offset: i });
                i + 2
            }
            _ => {
                blank(&mut self.expressions, i..i + 1, b'_');
                i + 1
            }
        }
    }

    fn code_step(&mut self, i: usize) -> usize {
        let src = self.src;
        match src[i] {
            b'#' => self.line_comment(i),
            b'/' if src.get(i + 1) == Some(&b'/') => self.line_comment(i),
            b'/' if src.get(i + 1) == Some(&b'*') => self.block_comment(i),
            b'"' => {
                self.stack.push(Frame::Str { offset: i });
                self.str_depth += 1;
                i + 1
            }
            b'\'' => {
                self.report(
                    AnomalyKind::StrayQuote,
                    i,
                    "single quotes do not delimit strings; use double quotes".to_string(),
                );
                i + 1
            }
            b'<' if src.get(i + 1) == Some(&b'<') => self.heredoc(i).unwrap_or(i + 2),
            open @ (b'{' | b'[' | b'(') => {
                self.stack.push(Frame::Delim { open, offset: i });
                i + 1
            }
            close @ (b'}' | b']' | b')') => {
                self.closer(close, i);
                i + 1
            }
            _ => i + 1,
        }
    }

    fn line_comment(&mut self, i: usize) -> usize {
        let end = self.src[i..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(self.src.len(), |p| i + p);
        self.blank_comment(i..end);
        end
    }

    fn block_comment(&mut self, i: usize) -> usize {
        let end = match self.src[i + 2..].windows(2).position(|w| w == b"*/") {
            Some(p) => i + 2 + p + 2,
            None => {
                self.report(
                    AnomalyKind::UnterminatedComment,
                    i,
                    "block comment is never closed".to_string(),
                );
                self.src.len()
            }
        };
        self.blank_comment(i..end);
        end
    }

    fn blank_comment(&mut self, range: Range<usize>) {
        blank(&mut self.uncommented, range.clone(), b' ');
        blank(&mut self.expressions, range.clone(), b' ');
        blank(&mut self.stripped, range, b' ');
    }

    /// `<<TAG` or `<<-TAG` at end of line. Returns `None` when `<<` does not
    /// introduce a heredoc.
    fn heredoc(&mut self, i: usize) -> Option<usize> {
        let src = self.src;
        let mut p = i + 2;
        if src.get(p) == Some(&b'-') {
            p += 1;
        }
        let tag_start = p;
        while p < src.len() && (src[p].is_ascii_alphanumeric() || src[p] == b'_') {
            p += 1;
        }
        if p == tag_start || src[tag_start].is_ascii_digit() {
            return None;
        }
        let tag = &src[tag_start..p];
        while p < src.len() && matches!(src[p], b' ' | b'\t' | b'\r') {
            p += 1;
        }
        if p >= src.len() || src[p] != b'\n' {
            return None;
        }

        let body_start = p + 1;
        let mut line_start = body_start;
        let (body_end, end) = loop {
            if line_start >= src.len() {
                self.report(
                    AnomalyKind::UnterminatedHeredoc,
                    i,
                    format!(
                        "heredoc <<{} has no terminator line",
                        String::from_utf8_lossy(tag)
                    ),
                );
                break (src.len(), src.len());
            }
            let line_end = src[line_start..]
                .iter()
                .position(|&b| b == b'\n')
                .map_or(src.len(), |q| line_start + q);
            if src[line_start..line_end].trim_ascii() == tag {
                break (line_start, line_end);
            }
            line_start = line_end + 1;
        };

        blank(&mut self.stripped, body_start..body_end, b'_');
        self.blank_template(body_start..body_end);
        self.heredocs.push(i..end);
        Some(end)
    }

    /// Blank heredoc text in the expression view, keeping interpolations.
    fn blank_template(&mut self, range: Range<usize>) {
        let src = self.src;
        let mut p = range.start;
        while p < range.end {
            let escaped = p > range.start && src[p - 1] == src[p];
            if matches!(src[p], b'$' | b'%') && src.get(p + 1) == Some(&b'{') && !escaped {
                let mut depth = 0usize;
                let mut q = p + 1;
                while q < range.end {
                    match src[q] {
                        b'{' => depth += 1,
                        b'}' => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                        }
                        _ => {}
                    }
                    q += 1;
                }
                p = (q + 1).min(range.end);
                continue;
            }
            if src[p] != b'\n' {
                self.expressions[p] = b'_';
            }
            p += 1;
        }
    }

    fn closer(&mut self, close: u8, i: usize) {
        let want = opener_for(close);
        match self.stack.last().copied() {
            Some(Frame::Interp { .. }) if close == b'}' => {
                self.stack.pop();
                return;
            }
            Some(Frame::Delim { open, .. }) if open == want => {
                self.stack.pop();
                return;
            }
            _ => {}
        }

        // Look through the delimiters of the current code context for a match.
        let mut k = self.stack.len();
        let mut found = None;
        while k > 0 {
            k -= 1;
            match self.stack[k] {
                Frame::Delim { open, .. } if open == want => {
                    found = Some(k);
                    break;
                }
                Frame::Delim { .. } => continue,
                Frame::Interp { .. } if close == b'}' => {
                    found = Some(k);
                    break;
                }
                _ => break,
            }
        }

        let Some(k) = found else {
            self.report(
                AnomalyKind::UnexpectedCloser,
                i,
                format!("unexpected `{}` with nothing to close", close as char),
            );
            return;
        };

        if let Some(Frame::Delim { open, offset }) = self.stack.last().copied() {
            let line = self.line_of(offset);
            self.report(
                AnomalyKind::MismatchedDelimiter,
                i,
                format!(
                    "found `{}` but `{}` opened on line {line} expects `{}`",
                    close as char,
                    open as char,
                    closer_for(open) as char
                ),
            );
        }
        self.stack.truncate(k);
    }

    fn unwind_at_eof(&mut self) {
        let frames = std::mem::take(&mut self.stack);
        for frame in frames {
            match frame {
                Frame::Delim { open, offset } => self.report(
                    AnomalyKind::UnclosedDelimiter,
                    offset,
                    format!("`{}` is never closed", open as char),
                ),
                Frame::Str { offset } => self.report(
                    AnomalyKind::UnterminatedString,
                    offset,
                    "string literal is not closed before end of file".to_string(),
                ),
                Frame::Interp { offset } => self.report(
                    AnomalyKind::UnclosedDelimiter,
                    offset,
                    "interpolation is never closed".to_string(),
                ),
            }
        }
        self.str_depth = 0;
    }

    fn finish(self) -> ScanOutput {
        let mut anomalies = self.anomalies;
        anomalies.sort_by_key(|(offset, _)| *offset);
        ScanOutput {
            stripped: into_string(self.stripped),
            expressions: into_string(self.expressions),
            uncommented: into_string(self.uncommented),
            heredocs: self.heredocs,
            anomalies: anomalies.into_iter().map(|(_, a)| a).collect(),
        }
    }
}

fn into_string(buf: Vec<u8>) -> String {
    // Blanking only ever replaces every byte of a character, so the buffer
    // stays valid UTF-8.
    String::from_utf8(buf).expect("blanking preserves UTF-8")
}
