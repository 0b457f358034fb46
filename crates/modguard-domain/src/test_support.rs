use crate::model::{
    Attribute, Block, Body, Declaration, DeclarationKind, LineSpan, ModuleModel, ParsedFile,
    ScanAnomaly, SourceFile,
};
use crate::patterns::builtin_patterns;
use crate::policy::{CheckPolicy, EffectiveConfig, ReadmeSection, Severity};
use modguard_types::{RepoPath, ids};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

/// Default severities for every check.
pub fn default_checks() -> BTreeMap<String, CheckPolicy> {
    let warn = [
        ids::CHECK_STRUCTURE_RECOMMENDED_FILES,
        ids::CHECK_STRUCTURE_README_SECTIONS,
        ids::CHECK_TYPE_PATTERN_VALIDATION,
        ids::CHECK_REFERENCE_RESOLVED,
        ids::CHECK_REFERENCE_UNUSED_VARIABLES,
    ];
    modguard_types::explain::all_check_ids()
        .iter()
        .map(|id| {
            let severity = if warn.contains(id) {
                Severity::Warn
            } else {
                Severity::Fail
            };
            (id.to_string(), CheckPolicy::enabled(severity))
        })
        .collect()
}

pub fn config() -> EffectiveConfig {
    EffectiveConfig {
        profile: "default".to_string(),
        checks: default_checks(),
        required_files: ["main.tf", "variables.tf", "outputs.tf", "versions.tf"]
            .map(String::from)
            .to_vec(),
        recommended_files: ["README.md", "examples/", ".gitignore"]
            .map(String::from)
            .to_vec(),
        versions_file: "versions.tf".to_string(),
        readme_file: "README.md".to_string(),
        readme_sections: vec![
            ReadmeSection::new("usage", &["usage"]),
            ReadmeSection::new("requirements", &["requirements", "prerequisites"]),
        ],
        naming_pattern: Regex::new(r"^[a-z_][a-z0-9_-]*$").expect("regex"),
        provider_namespaces: vec!["aws".to_string(), "random".to_string()],
        builtin_providers: vec!["terraform".to_string()],
        type_patterns: builtin_patterns(),
    }
}

/// Config with exactly one check enabled.
pub fn config_with_check(check_id: &str, severity: Severity, allow: Vec<&str>) -> EffectiveConfig {
    let mut cfg = config();
    for (id, policy) in cfg.checks.iter_mut() {
        if id != check_id {
            *policy = CheckPolicy::disabled();
        }
    }
    cfg.checks.insert(
        check_id.to_string(),
        CheckPolicy {
            enabled: true,
            severity,
            allow: allow.into_iter().map(String::from).collect(),
        },
    );
    cfg
}

pub fn attr(name: &str, value: &str, line: u32) -> Attribute {
    Attribute {
        name: name.to_string(),
        value: value.to_string(),
        expression: blank_strings(value),
        line,
    }
}

/// Blank double-quoted literal text the way the scanner does, keeping
/// `${...}` interpolations. Good enough for hand-built fixtures.
fn blank_strings(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_str = false;
    let mut interp = 0usize;
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        if interp > 0 {
            match c {
                '{' => interp += 1,
                '}' => interp -= 1,
                _ => {}
            }
            out.push(c);
            continue;
        }
        match (in_str, c) {
            (false, '"') => {
                in_str = true;
                out.push(c);
            }
            (true, '"') => {
                in_str = false;
                out.push(c);
            }
            (true, '$') if chars.peek() == Some(&'{') => {
                out.push(c);
                out.push('{');
                chars.next();
                interp = 1;
            }
            (true, _) => out.push('_'),
            (false, _) => out.push(c),
        }
    }
    out
}

pub fn validation(condition: &str, line: u32) -> Block {
    Block {
        kind: "validation".to_string(),
        labels: Vec::new(),
        body: Body {
            attributes: vec![
                attr("condition", condition, line + 1),
                attr("error_message", "\"invalid\"", line + 2),
            ],
            blocks: Vec::new(),
        },
        span: LineSpan {
            start: line,
            end: line + 3,
        },
    }
}

pub fn decl(
    kind: DeclarationKind,
    type_name: Option<&str>,
    name: &str,
    file: &str,
    line: u32,
    attributes: Vec<Attribute>,
    blocks: Vec<Block>,
) -> Declaration {
    Declaration {
        kind,
        type_name: type_name.map(String::from),
        name: name.to_string(),
        file: RepoPath::new(file),
        span: LineSpan {
            start: line,
            end: line + 5,
        },
        body: Body { attributes, blocks },
    }
}

pub fn variable(name: &str, attributes: Vec<Attribute>, blocks: Vec<Block>) -> Declaration {
    decl(
        DeclarationKind::Variable,
        None,
        name,
        "variables.tf",
        1,
        attributes,
        blocks,
    )
}

pub fn output(name: &str, value: Option<&str>) -> Declaration {
    let mut attributes = vec![attr("description", "\"an output\"", 2)];
    if let Some(v) = value {
        attributes.push(attr("value", v, 3));
    }
    decl(
        DeclarationKind::Output,
        None,
        name,
        "outputs.tf",
        1,
        attributes,
        Vec::new(),
    )
}

pub fn resource(type_name: &str, name: &str, attributes: Vec<Attribute>) -> Declaration {
    decl(
        DeclarationKind::Resource,
        Some(type_name),
        name,
        "main.tf",
        1,
        attributes,
        Vec::new(),
    )
}

pub fn file(path: &str, declarations: Vec<Declaration>, anomalies: Vec<ScanAnomaly>) -> ParsedFile {
    ParsedFile {
        source: SourceFile {
            path: RepoPath::new(path),
            raw: String::new(),
            stripped: String::new(),
        },
        declarations,
        anomalies,
    }
}

/// Model whose entries are exactly the given files' paths plus `extra`.
pub fn model(mut files: Vec<ParsedFile>, extra: &[&str]) -> ModuleModel {
    files.sort_by(|a, b| a.source.path.cmp(&b.source.path));
    let mut entries: BTreeSet<String> = files
        .iter()
        .map(|f| f.source.path.as_str().to_string())
        .collect();
    entries.extend(extra.iter().map(|e| e.to_string()));
    ModuleModel {
        root: ".".to_string(),
        files,
        entries,
        documents: BTreeMap::new(),
    }
}

/// `model` plus a README with the given text.
pub fn model_with_readme(files: Vec<ParsedFile>, readme: &str) -> ModuleModel {
    let mut m = model(files, &["README.md"]);
    m.documents.insert("README.md".to_string(), readme.to_string());
    m
}
