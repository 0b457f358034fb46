use modguard_types::{RepoPath, ids};
use std::collections::{BTreeMap, BTreeSet};

/// One scanned configuration file.
///
/// `stripped` has the same byte length as `raw`: comments are blanked with
/// spaces and string contents with `_`, newlines are preserved.
#[derive(Clone, Debug, Default)]
pub struct SourceFile {
    pub path: RepoPath,
    pub raw: String,
    pub stripped: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum AnomalyKind {
    UnclosedDelimiter,
    UnexpectedCloser,
    MismatchedDelimiter,
    UnterminatedString,
    UnterminatedHeredoc,
    UnterminatedComment,
    StrayQuote,
    UnclosedBlock,
    MalformedHeader,
    /// The file was not valid UTF-8 and was decoded lossily.
    InvalidEncoding,
}

impl AnomalyKind {
    pub fn code(self) -> &'static str {
        match self {
            AnomalyKind::UnclosedDelimiter => ids::CODE_UNCLOSED_DELIMITER,
            AnomalyKind::UnexpectedCloser => ids::CODE_UNEXPECTED_CLOSER,
            AnomalyKind::MismatchedDelimiter => ids::CODE_MISMATCHED_DELIMITER,
            AnomalyKind::UnterminatedString => ids::CODE_UNTERMINATED_STRING,
            AnomalyKind::UnterminatedHeredoc => ids::CODE_UNTERMINATED_HEREDOC,
            AnomalyKind::UnterminatedComment => ids::CODE_UNTERMINATED_COMMENT,
            AnomalyKind::StrayQuote => ids::CODE_STRAY_QUOTE,
            AnomalyKind::UnclosedBlock => ids::CODE_UNCLOSED_BLOCK,
            AnomalyKind::MalformedHeader => ids::CODE_MALFORMED_HEADER,
            AnomalyKind::InvalidEncoding => ids::CODE_INVALID_ENCODING,
        }
    }
}

/// A lexical or structural problem found while scanning one file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanAnomaly {
    pub kind: AnomalyKind,
    /// 1-based.
    pub line: u32,
    /// 1-based byte column.
    pub col: u32,
    pub detail: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DeclarationKind {
    Resource,
    DataSource,
    Variable,
    Output,
    Local,
    Module,
    Provider,
    /// The `terraform { ... }` settings block.
    Settings,
}

impl DeclarationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DeclarationKind::Resource => "resource",
            DeclarationKind::DataSource => "data",
            DeclarationKind::Variable => "variable",
            DeclarationKind::Output => "output",
            DeclarationKind::Local => "local",
            DeclarationKind::Module => "module",
            DeclarationKind::Provider => "provider",
            DeclarationKind::Settings => "terraform",
        }
    }

    /// Kinds that expressions can refer to by address.
    pub fn is_referenceable(self) -> bool {
        matches!(
            self,
            DeclarationKind::Resource
                | DeclarationKind::DataSource
                | DeclarationKind::Variable
                | DeclarationKind::Local
                | DeclarationKind::Module
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LineSpan {
    pub start: u32,
    pub end: u32,
}

/// `name = value` inside a block body.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    /// Value text with comments removed and string contents intact.
    pub value: String,
    /// Value text with string literal contents blanked; interpolations are kept.
    pub expression: String,
    pub line: u32,
}

/// A nested block such as `validation { ... }` or `dynamic "ingress" { ... }`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Block {
    pub kind: String,
    pub labels: Vec<String>,
    pub body: Body,
    pub span: LineSpan,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Body {
    pub attributes: Vec<Attribute>,
    pub blocks: Vec<Block>,
}

impl Body {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn blocks_of<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Block> + 'a {
        self.blocks.iter().filter(move |b| b.kind == kind)
    }

    /// Visit every attribute in this body and all nested blocks, depth first,
    /// with a dotted path such as `validation.condition`.
    pub fn walk<'a>(&'a self, f: &mut dyn FnMut(&str, &'a Attribute)) {
        self.walk_prefixed("", f);
    }

    fn walk_prefixed<'a>(&'a self, prefix: &str, f: &mut dyn FnMut(&str, &'a Attribute)) {
        for attr in &self.attributes {
            if prefix.is_empty() {
                f(&attr.name, attr);
            } else {
                f(&format!("{prefix}.{}", attr.name), attr);
            }
        }
        for block in &self.blocks {
            let nested = if prefix.is_empty() {
                block.kind.clone()
            } else {
                format!("{prefix}.{}", block.kind)
            };
            block.body.walk_prefixed(&nested, f);
        }
    }
}

/// A named top-level unit of a configuration module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    pub kind: DeclarationKind,
    /// Resource or data source type, e.g. `aws_vpc`.
    pub type_name: Option<String>,
    pub name: String,
    pub file: RepoPath,
    pub span: LineSpan,
    pub body: Body,
}

impl Declaration {
    /// Address used in expressions and reports, e.g. `var.region`,
    /// `aws_vpc.main`, `data.aws_ami.ubuntu`.
    pub fn address(&self) -> String {
        let type_name = self.type_name.as_deref().unwrap_or_default();
        match self.kind {
            DeclarationKind::Resource => format!("{type_name}.{}", self.name),
            DeclarationKind::DataSource => format!("data.{type_name}.{}", self.name),
            DeclarationKind::Variable => format!("var.{}", self.name),
            DeclarationKind::Output => format!("output.{}", self.name),
            DeclarationKind::Local => format!("local.{}", self.name),
            DeclarationKind::Module => format!("module.{}", self.name),
            DeclarationKind::Provider => format!("provider.{}", self.name),
            DeclarationKind::Settings => "terraform".to_string(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.body.attribute(name)
    }

    pub fn validations(&self) -> impl Iterator<Item = &Block> {
        self.body.blocks_of("validation")
    }

    /// Non-empty literal text of the `description` attribute.
    pub fn description(&self) -> Option<&str> {
        self.attribute("description")
            .map(|a| literal_text(&a.value))
            .filter(|d| !d.trim().is_empty())
    }
}

/// Unquote a literal value: `"text"` yields `text`, a heredoc yields its body,
/// anything else is returned trimmed.
pub fn literal_text(value: &str) -> &str {
    let v = value.trim();
    if v.len() >= 2 && v.starts_with('"') && v.ends_with('"') {
        return &v[1..v.len() - 1];
    }
    if let Some(rest) = v.strip_prefix("<<") {
        let rest = rest.strip_prefix('-').unwrap_or(rest);
        let Some((tag, body)) = rest.split_once('\n') else {
            return "";
        };
        let tag = tag.trim();
        return body
            .trim_end()
            .strip_suffix(tag)
            .unwrap_or(body)
            .trim_end();
    }
    v
}

/// Result of scanning and extracting one file.
#[derive(Clone, Debug, Default)]
pub struct ParsedFile {
    pub source: SourceFile,
    pub declarations: Vec<Declaration>,
    pub anomalies: Vec<ScanAnomaly>,
}

/// Everything extracted from one input directory.
#[derive(Clone, Debug, Default)]
pub struct ModuleModel {
    /// Input directory as given by the caller.
    pub root: String,
    /// Parsed files, sorted by path.
    pub files: Vec<ParsedFile>,
    /// Names of all top-level entries in the directory (files and dirs).
    pub entries: BTreeSet<String>,
    /// Text of non-configuration files read alongside the module, keyed by
    /// file name (the README).
    pub documents: BTreeMap<String, String>,
}

impl ModuleModel {
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.files.iter().flat_map(|f| f.declarations.iter())
    }

    pub fn declarations_of(&self, kind: DeclarationKind) -> impl Iterator<Item = &Declaration> {
        self.declarations().filter(move |d| d.kind == kind)
    }

    /// A configuration file that was actually scanned.
    pub fn file(&self, name: &str) -> Option<&ParsedFile> {
        self.files.iter().find(|f| f.source.path.as_str() == name)
    }

    pub fn document(&self, name: &str) -> Option<&str> {
        self.documents.get(name).map(String::as_str)
    }

    pub fn has_entry(&self, name: &str) -> bool {
        self.entries.contains(name.trim_end_matches('/'))
    }
}
