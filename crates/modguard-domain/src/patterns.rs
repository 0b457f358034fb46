//! Variable category recognition for type-pattern validation.
//!
//! A variable is classified by its name first: the lowercased name, with
//! hyphens folded to underscores, is split into `_`-separated words and
//! each pattern's keys are matched as whole word runs (`vpc_cidr_block`
//! matches the keys `cidr` and `cidr_block`). When no name key matches, the
//! literal default value is tried against each pattern's `default_pattern`.
//! The first matching pattern in table order wins.

use crate::model::{Declaration, literal_text};
use regex::Regex;

#[derive(Clone, Debug)]
pub struct TypePattern {
    pub name: String,
    pub name_keys: Vec<String>,
    pub default_pattern: Option<Regex>,
    /// A validation condition must match this to count as plausible.
    /// `None` accepts any condition that references the variable.
    pub plausible: Option<Regex>,
    /// When non-empty the category is validated by the `type` constraint
    /// instead of a validation block.
    pub accepted_types: Vec<String>,
}

impl TypePattern {
    pub fn new(
        name: &str,
        name_keys: &[&str],
        default_pattern: Option<&str>,
        plausible: Option<&str>,
        accepted_types: &[&str],
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.to_string(),
            name_keys: name_keys.iter().map(|k| k.to_ascii_lowercase()).collect(),
            default_pattern: default_pattern.map(Regex::new).transpose()?,
            plausible: plausible.map(Regex::new).transpose()?,
            accepted_types: accepted_types.iter().map(|t| t.to_string()).collect(),
        })
    }

    fn matches_name(&self, padded: &str) -> bool {
        self.name_keys
            .iter()
            .any(|k| padded.contains(&format!("_{k}_")))
    }

    /// `type = list(string)` satisfies an accepted type of `list`.
    pub fn accepts_type(&self, type_expr: &str) -> bool {
        let t = type_expr.trim();
        self.accepted_types.iter().any(|accepted| {
            t.strip_prefix(accepted.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.trim_start().starts_with('('))
        })
    }
}

/// Ordered, data-driven set of type patterns.
#[derive(Clone, Debug, Default)]
pub struct PatternTable {
    patterns: Vec<TypePattern>,
}

impl PatternTable {
    pub fn new(patterns: Vec<TypePattern>) -> Self {
        Self { patterns }
    }

    /// Replace the pattern with the same name, or append a new one.
    pub fn upsert(&mut self, pattern: TypePattern) {
        match self.patterns.iter_mut().find(|p| p.name == pattern.name) {
            Some(existing) => *existing = pattern,
            None => self.patterns.push(pattern),
        }
    }

    pub fn get(&self, name: &str) -> Option<&TypePattern> {
        self.patterns.iter().find(|p| p.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|p| p.name.as_str())
    }

    pub fn classify(&self, var: &Declaration) -> Option<&TypePattern> {
        let normalized = var.name.to_ascii_lowercase().replace('-', "_");
        let padded = format!("_{normalized}_");
        if let Some(p) = self.patterns.iter().find(|p| p.matches_name(&padded)) {
            return Some(p);
        }

        let default = var.attribute("default").map(|a| literal_text(&a.value))?;
        self.patterns.iter().find(|p| {
            p.default_pattern
                .as_ref()
                .is_some_and(|re| re.is_match(default))
        })
    }
}

type PatternSpec = (
    &'static str,
    &'static [&'static str],
    Option<&'static str>,
    Option<&'static str>,
    &'static [&'static str],
);

const BUILTIN: &[PatternSpec] = &[
    (
        "cidr",
        &["cidr", "cidrs", "cidr_block", "cidr_blocks"],
        Some(r"^\d{1,3}(\.\d{1,3}){3}/\d{1,2}$"),
        Some(r"cidr(host|netmask|subnet|subnets)\s*\("),
        &[],
    ),
    (
        "region",
        &["region"],
        Some(r"^[a-z]{2}(-[a-z]+)+-\d+$"),
        Some(r"(regex|regexall|contains|startswith)\s*\("),
        &[],
    ),
    (
        "instance_type",
        &[
            "instance_type",
            "instance_class",
            "instance_size",
            "node_type",
            "machine_type",
            "vm_size",
        ],
        Some(r"^[a-z][a-z0-9-]*\.[a-z0-9]+$"),
        Some(r"(regex|regexall|contains|startswith)\s*\("),
        &[],
    ),
    (
        "ami",
        &["ami", "ami_id", "image_id"],
        Some(r"^ami-[0-9a-f]+$"),
        Some(r"(regex|regexall|startswith|substr)\s*\("),
        &[],
    ),
    (
        "environment",
        &["environment", "env", "stage"],
        None,
        Some(r"(contains|regex|regexall)\s*\("),
        &[],
    ),
    (
        "boolean",
        &["enable", "enabled", "create", "use", "is"],
        Some(r"^(true|false)$"),
        None,
        &["bool"],
    ),
    (
        "collection",
        &[
            "tags",
            "labels",
            "ids",
            "names",
            "zones",
            "azs",
            "availability_zones",
            "list",
            "map",
        ],
        Some(r"^[\[{]"),
        None,
        &["list", "map", "set", "object", "tuple"],
    ),
    (
        "name",
        &["name", "prefix", "name_prefix"],
        None,
        Some(r"(regex|regexall|length|can)\s*\("),
        &[],
    ),
];

/// The default pattern table.
pub fn builtin_patterns() -> PatternTable {
    let patterns = BUILTIN
        .iter()
        .map(|(name, keys, default, plausible, types)| {
            TypePattern::new(name, keys, *default, *plausible, types)
                .expect("builtin type patterns compile")
        })
        .collect();
    PatternTable::new(patterns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Attribute, Body, DeclarationKind, LineSpan};
    use modguard_types::RepoPath;

    fn var(name: &str, default: Option<&str>) -> Declaration {
        let mut body = Body::default();
        if let Some(d) = default {
            body.attributes.push(Attribute {
                name: "default".into(),
                value: d.into(),
                expression: d.into(),
                line: 2,
            });
        }
        Declaration {
            kind: DeclarationKind::Variable,
            type_name: None,
            name: name.into(),
            file: RepoPath::new("variables.tf"),
            span: LineSpan { start: 1, end: 3 },
            body,
        }
    }

    fn class(table: &PatternTable, name: &str, default: Option<&str>) -> Option<String> {
        table.classify(&var(name, default)).map(|p| p.name.clone())
    }

    #[test]
    fn classifies_by_name_words() {
        let t = builtin_patterns();
        assert_eq!(class(&t, "VPC_CIDR", None).as_deref(), Some("cidr"));
        assert_eq!(class(&t, "region", None).as_deref(), Some("region"));
        assert_eq!(class(&t, "web-instance-type", None).as_deref(), Some("instance_type"));
        assert_eq!(class(&t, "ami_id", None).as_deref(), Some("ami"));
        assert_eq!(class(&t, "enable_nat_gateway", None).as_deref(), Some("boolean"));
        assert_eq!(class(&t, "subnet_ids", None).as_deref(), Some("collection"));
        assert_eq!(class(&t, "cluster_name", None).as_deref(), Some("name"));
    }

    #[test]
    fn word_boundaries_are_respected() {
        let t = builtin_patterns();
        // "regional" is not "region", "amigo" is not "ami".
        assert_eq!(class(&t, "regional_thing", None), None);
        assert_eq!(class(&t, "amigo", None), None);
    }

    #[test]
    fn falls_back_to_default_value() {
        let t = builtin_patterns();
        assert_eq!(
            class(&t, "network", Some("\"10.0.0.0/16\"")).as_deref(),
            Some("cidr")
        );
        assert_eq!(class(&t, "flag", Some("true")).as_deref(), Some("boolean"));
        assert_eq!(class(&t, "whatever", Some("\"hello\"")), None);
    }

    #[test]
    fn upsert_replaces_by_name_and_appends_new() {
        let mut t = builtin_patterns();
        let before = t.names().count();
        t.upsert(TypePattern::new("region", &["location"], None, None, &[]).expect("compile"));
        assert_eq!(t.names().count(), before);
        assert_eq!(class(&t, "location", None).as_deref(), Some("region"));
        assert_eq!(class(&t, "region", None), None);

        t.upsert(TypePattern::new("port", &["port"], None, None, &["number"]).expect("compile"));
        assert_eq!(t.names().last(), Some("port"));
    }

    #[test]
    fn accepts_type_with_and_without_arguments() {
        let t = builtin_patterns();
        let coll = t.get("collection").expect("registered");
        assert!(coll.accepts_type("list(string)"));
        assert!(coll.accepts_type(" map(any) "));
        assert!(!coll.accepts_type("string"));
        assert!(!coll.accepts_type("listy"));
        let boolean = t.get("boolean").expect("registered");
        assert!(boolean.accepts_type("bool"));
    }
}
