use crate::patterns::PatternTable;
use modguard_types::Status;
use regex::Regex;
use std::collections::BTreeMap;

/// Level a violated rule reports at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Warn,
    Fail,
}

impl Severity {
    pub fn status(self) -> Status {
        match self {
            Severity::Warn => Status::Warn,
            Severity::Fail => Status::Fail,
        }
    }
}

#[derive(Clone, Debug)]
pub struct CheckPolicy {
    pub enabled: bool,
    pub severity: Severity,
    /// Glob patterns matched against verdict targets; matches are suppressed.
    pub allow: Vec<String>,
}

impl CheckPolicy {
    pub fn enabled(severity: Severity) -> Self {
        Self {
            enabled: true,
            severity,
            allow: Vec::new(),
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            severity: Severity::Warn,
            allow: Vec::new(),
        }
    }
}

/// A section a module README is expected to carry. It is present when a
/// Markdown heading contains any of `keywords` (case-insensitive).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadmeSection {
    pub name: String,
    pub keywords: Vec<String>,
}

impl ReadmeSection {
    pub fn new(name: &str, keywords: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }
}

/// Fully resolved configuration the engine runs against.
///
/// Built by `modguard-settings`; every regex and glob in here has already
/// been validated.
#[derive(Clone, Debug)]
pub struct EffectiveConfig {
    pub profile: String,
    pub checks: BTreeMap<String, CheckPolicy>,
    /// File names (with extension) that must be present.
    pub required_files: Vec<String>,
    /// Entries whose absence only warns; a trailing `/` marks a directory.
    pub recommended_files: Vec<String>,
    /// File expected to hold the `terraform` settings block.
    pub versions_file: String,
    /// README read for section checks.
    pub readme_file: String,
    pub readme_sections: Vec<ReadmeSection>,
    pub naming_pattern: Regex,
    /// Resource type prefixes treated as external when not declared locally.
    pub provider_namespaces: Vec<String>,
    /// Providers that never need a version pin.
    pub builtin_providers: Vec<String>,
    pub type_patterns: PatternTable,
}

impl EffectiveConfig {
    pub fn check_policy(&self, check_id: &str) -> Option<&CheckPolicy> {
        self.checks.get(check_id).filter(|p| p.enabled)
    }
}
