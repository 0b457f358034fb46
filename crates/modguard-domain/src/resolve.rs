//! Reference Resolver: classify identifiers used in expressions against the
//! declarations of the module.

use crate::model::{Body, Declaration, DeclarationKind, ModuleModel, literal_text};
use modguard_types::{ReferenceCounts, RepoPath};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

static SIMPLE_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(var|local|module)\.([A-Za-z_][A-Za-z0-9_-]*)").expect("static regex")
});
static DATA_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bdata\.([A-Za-z_][A-Za-z0-9_-]*)\.([A-Za-z_][A-Za-z0-9_-]*)")
        .expect("static regex")
});
static RESOURCE_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([a-z][a-z0-9]*_[a-z0-9_]*)\.([A-Za-z_][A-Za-z0-9_-]*)")
        .expect("static regex")
});
/// `for k, v in` / `for v in` binders of a `for` expression.
static FOR_BINDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bfor\s+([A-Za-z_][A-Za-z0-9_-]*)(?:\s*,\s*([A-Za-z_][A-Za-z0-9_-]*))?\s+in\b")
        .expect("static regex")
});

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum RefKind {
    Variable,
    Local,
    Module,
    DataSource,
    Resource,
}

/// An identifier found in an expression, e.g. `var.region` or `aws_vpc.main`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefTarget {
    pub kind: RefKind,
    pub address: String,
    /// Resource or data source type for those kinds.
    pub type_name: Option<String>,
}

impl RefTarget {
    /// First dotted segment: `var`, `data`, or a resource type.
    pub fn root(&self) -> &str {
        self.address.split('.').next().unwrap_or(&self.address)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    Resolved { file: RepoPath, line: u32 },
    Unresolved,
    External { namespace: String },
}

impl Resolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::Resolved { .. } => "resolved",
            Resolution::Unresolved => "unresolved",
            Resolution::External { .. } => "external",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reference {
    /// Address of the referring declaration.
    pub source: String,
    pub source_kind: DeclarationKind,
    pub file: RepoPath,
    pub line: u32,
    /// Dotted attribute path the reference was found in.
    pub attribute: String,
    pub target: RefTarget,
    pub resolution: Resolution,
}

/// Extract reference targets from an expression, in order of appearance,
/// without duplicates. Names bound by a `for` expression inside it are not
/// references.
pub fn targets_in(expression: &str) -> Vec<RefTarget> {
    let bound = for_binders(expression);
    let mut found: Vec<(usize, RefTarget)> = Vec::new();

    for caps in SIMPLE_REF.captures_iter(expression) {
        let whole = caps.get(0).expect("group 0 always present");
        if preceded_by_dot(expression, whole.start()) {
            continue;
        }
        let kind = match &caps[1] {
            "var" => RefKind::Variable,
            "local" => RefKind::Local,
            _ => RefKind::Module,
        };
        found.push((
            whole.start(),
            RefTarget {
                kind,
                address: whole.as_str().to_string(),
                type_name: None,
            },
        ));
    }

    for caps in DATA_REF.captures_iter(expression) {
        let whole = caps.get(0).expect("group 0 always present");
        if preceded_by_dot(expression, whole.start()) {
            continue;
        }
        found.push((
            whole.start(),
            RefTarget {
                kind: RefKind::DataSource,
                address: whole.as_str().to_string(),
                type_name: Some(caps[1].to_string()),
            },
        ));
    }

    for caps in RESOURCE_REF.captures_iter(expression) {
        let whole = caps.get(0).expect("group 0 always present");
        if preceded_by_dot(expression, whole.start()) {
            continue;
        }
        found.push((
            whole.start(),
            RefTarget {
                kind: RefKind::Resource,
                address: whole.as_str().to_string(),
                type_name: Some(caps[1].to_string()),
            },
        ));
    }

    found.sort_by_key(|(offset, _)| *offset);
    let mut seen = BTreeSet::new();
    found
        .into_iter()
        .filter(|(_, t)| !bound.contains(t.root()))
        .filter(|(_, t)| seen.insert(t.address.clone()))
        .map(|(_, t)| t)
        .collect()
}

fn preceded_by_dot(text: &str, offset: usize) -> bool {
    text[..offset].ends_with('.')
}

fn for_binders(expression: &str) -> BTreeSet<&str> {
    FOR_BINDER
        .captures_iter(expression)
        .flat_map(|caps| [caps.get(1), caps.get(2)])
        .flatten()
        .map(|m| m.as_str())
        .collect()
}

/// Iterator names introduced by `dynamic` blocks anywhere in `body`: the
/// `iterator` attribute when set, otherwise the block label.
pub fn dynamic_iterators(body: &Body) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    collect_iterators(body, &mut names);
    names
}

fn collect_iterators(body: &Body, names: &mut BTreeSet<String>) {
    for block in &body.blocks {
        if block.kind == "dynamic" {
            let name = match block.body.attribute("iterator") {
                Some(it) => Some(literal_text(&it.value).to_string()),
                None => block.labels.first().cloned(),
            };
            names.extend(name.filter(|n| !n.is_empty()));
        }
        collect_iterators(&block.body, names);
    }
}

/// First-occurrence index of referenceable declarations.
pub struct Resolver<'a> {
    index: BTreeMap<String, &'a Declaration>,
    namespaces: &'a [String],
}

impl<'a> Resolver<'a> {
    pub fn new(model: &'a ModuleModel, provider_namespaces: &'a [String]) -> Self {
        let mut index = BTreeMap::new();
        for decl in model.declarations().filter(|d| d.kind.is_referenceable()) {
            index.entry(decl.address()).or_insert(decl);
        }
        Self {
            index,
            namespaces: provider_namespaces,
        }
    }

    pub fn resolve(&self, target: &RefTarget) -> Resolution {
        if let Some(decl) = self.index.get(&target.address) {
            return Resolution::Resolved {
                file: decl.file.clone(),
                line: decl.span.start,
            };
        }

        if let Some(type_name) = target.type_name.as_deref() {
            let prefix = type_name.split('_').next().unwrap_or(type_name);
            if self.namespaces.iter().any(|ns| ns == prefix) {
                return Resolution::External {
                    namespace: prefix.to_string(),
                };
            }
        }

        Resolution::Unresolved
    }

    /// Every reference in the module, one per (source, target) pair, in
    /// file then declaration then attribute order. `dynamic` iterators of a
    /// declaration are local to it and never count as references.
    pub fn resolve_all(&self, model: &ModuleModel) -> Vec<Reference> {
        let mut out = Vec::new();
        for decl in model.declarations() {
            let source = decl.address();
            let iterators = dynamic_iterators(&decl.body);
            let mut seen = BTreeSet::new();
            decl.body.walk(&mut |path, attr| {
                for target in targets_in(&attr.expression) {
                    if iterators.contains(target.root()) || !seen.insert(target.address.clone()) {
                        continue;
                    }
                    let resolution = self.resolve(&target);
                    out.push(Reference {
                        source: source.clone(),
                        source_kind: decl.kind,
                        file: decl.file.clone(),
                        line: attr.line,
                        attribute: path.to_string(),
                        target,
                        resolution,
                    });
                }
            });
        }
        out
    }
}

pub fn count(references: &[Reference]) -> ReferenceCounts {
    let mut counts = ReferenceCounts::default();
    for r in references {
        match r.resolution {
            Resolution::Resolved { .. } => counts.resolved += 1,
            Resolution::Unresolved => counts.unresolved += 1,
            Resolution::External { .. } => counts.external += 1,
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Attribute, Body, LineSpan, ParsedFile};

    fn addresses(expr: &str) -> Vec<String> {
        targets_in(expr).into_iter().map(|t| t.address).collect()
    }

    #[test]
    fn extracts_each_reference_shape() {
        assert_eq!(
            addresses("merge(var.tags, local.common, { Name = module.vpc.name })"),
            vec!["var.tags", "local.common", "module.vpc"]
        );
        assert_eq!(
            addresses("data.aws_ami.ubuntu.id"),
            vec!["data.aws_ami.ubuntu"]
        );
        assert_eq!(addresses("aws_vpc.main.id"), vec!["aws_vpc.main"]);
    }

    #[test]
    fn ignores_attribute_chains_and_builtins() {
        assert!(addresses("each.value.subnet_id").is_empty());
        assert!(addresses("path.module").is_empty());
        assert!(addresses("count.index").is_empty());
        assert_eq!(addresses("var.foo_bar.baz"), vec!["var.foo_bar"]);
        assert!(addresses("myvar.x").is_empty());
    }

    #[test]
    fn for_binders_are_not_references() {
        assert_eq!(
            addresses("[for sub_net in aws_subnet.private : sub_net.id]"),
            vec!["aws_subnet.private"]
        );
        assert_eq!(
            addresses(
                "{ for zone_name, sub_net in var.subnets : zone_name => sub_net.cidr_block }"
            ),
            vec!["var.subnets"]
        );
        // Outside its own expression the name is a reference again.
        assert_eq!(addresses("sub_net.id"), vec!["sub_net.id"]);
    }

    #[test]
    fn deduplicates_in_order() {
        assert_eq!(
            addresses("var.a + var.b + var.a"),
            vec!["var.a", "var.b"]
        );
    }

    fn decl(kind: DeclarationKind, type_name: Option<&str>, name: &str, expr: &str) -> Declaration {
        Declaration {
            kind,
            type_name: type_name.map(str::to_string),
            name: name.into(),
            file: RepoPath::new("main.tf"),
            span: LineSpan { start: 1, end: 3 },
            body: Body {
                attributes: vec![Attribute {
                    name: "value".into(),
                    value: expr.into(),
                    expression: expr.into(),
                    line: 2,
                }],
                blocks: Vec::new(),
            },
        }
    }

    #[test]
    fn classifies_resolved_unresolved_and_external() {
        let model = ModuleModel {
            root: ".".into(),
            files: vec![ParsedFile {
                declarations: vec![
                    decl(DeclarationKind::Resource, Some("aws_vpc"), "main", "var.cidr"),
                    decl(
                        DeclarationKind::Output,
                        None,
                        "ids",
                        "[aws_vpc.main.id, aws_subnet.gone.id, var.missing, custom_thing.x]",
                    ),
                ],
                ..ParsedFile::default()
            }],
            ..ModuleModel::default()
        };
        let namespaces = vec!["aws".to_string()];
        let resolver = Resolver::new(&model, &namespaces);
        let refs = resolver.resolve_all(&model);

        let by_target: BTreeMap<_, _> = refs
            .iter()
            .map(|r| (r.target.address.as_str(), r.resolution.as_str()))
            .collect();
        assert_eq!(by_target["var.cidr"], "unresolved");
        assert_eq!(by_target["aws_vpc.main"], "resolved");
        assert_eq!(by_target["aws_subnet.gone"], "external");
        assert_eq!(by_target["var.missing"], "unresolved");
        assert_eq!(by_target["custom_thing.x"], "unresolved");

        let counts = count(&refs);
        assert_eq!(counts.resolved, 1);
        assert_eq!(counts.external, 1);
        assert_eq!(counts.unresolved, 3);
    }

    #[test]
    fn duplicate_declarations_resolve_to_first() {
        let mut first = decl(DeclarationKind::Variable, None, "region", "");
        first.span.start = 1;
        let mut second = first.clone();
        second.span.start = 10;
        let user = decl(DeclarationKind::Output, None, "r", "var.region");
        let model = ModuleModel {
            root: ".".into(),
            files: vec![ParsedFile {
                declarations: vec![first, second, user],
                ..ParsedFile::default()
            }],
            ..ModuleModel::default()
        };
        let resolver = Resolver::new(&model, &[]);
        let refs = resolver.resolve_all(&model);
        assert_eq!(refs.len(), 1);
        assert_eq!(
            refs[0].resolution,
            Resolution::Resolved {
                file: RepoPath::new("main.tf"),
                line: 1
            }
        );
    }
}
