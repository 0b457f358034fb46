use crate::RepoPath;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Stable schema identifier for modguard reports.
pub const SCHEMA_REPORT_V1: &str = "modguard.report.v1";

/// Outcome of one rule against one target.
///
/// Only `Fail` affects the overall result; `Warn` is advisory.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pass,
    Warn,
    Fail,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Pass => "pass",
            Status::Warn => "warn",
            Status::Fail => "fail",
        }
    }
}

/// Named group of related rules. Declaration order is report order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Structure,
    Naming,
    Description,
    TypePattern,
    Version,
    Reference,
    Output,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Structure,
        Category::Naming,
        Category::Description,
        Category::TypePattern,
        Category::Version,
        Category::Reference,
        Category::Output,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Structure => "structure",
            Category::Naming => "naming",
            Category::Description => "description",
            Category::TypePattern => "type_pattern",
            Category::Version => "version",
            Category::Reference => "reference",
            Category::Output => "output",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Category::Structure => "Structure",
            Category::Naming => "Naming",
            Category::Description => "Description",
            Category::TypePattern => "Type-pattern validation",
            Category::Version => "Version constraints",
            Category::Reference => "References",
            Category::Output => "Output correctness",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Location {
    pub path: RepoPath,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col: Option<u32>,
}

impl Location {
    pub fn file(path: &RepoPath) -> Self {
        Self {
            path: path.clone(),
            line: None,
            col: None,
        }
    }

    pub fn line(path: &RepoPath, line: u32) -> Self {
        Self {
            path: path.clone(),
            line: Some(line),
            col: None,
        }
    }
}

/// One rule's result for one target (a file or a declaration address).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Verdict {
    pub check_id: String,
    pub code: String,
    pub category: Category,
    pub status: Status,
    /// File path or declaration address the verdict is about.
    pub target: String,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,

    /// Stable identifier intended for dedup and trending. A hash of
    /// `check_id + code + path + target`. Pass verdicts carry none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,

    /// Check-specific structured payload (kept open-ended for forward compatibility).
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub data: JsonValue,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Summary {
    pub passed: u32,
    pub warned: u32,
    pub failed: u32,
    pub total: u32,
}

impl Summary {
    pub fn record(&mut self, status: Status) {
        match status {
            Status::Pass => self.passed += 1,
            Status::Warn => self.warned += 1,
            Status::Fail => self.failed += 1,
        }
        self.total += 1;
    }

    pub fn absorb(&mut self, other: &Summary) {
        self.passed += other.passed;
        self.warned += other.warned;
        self.failed += other.failed;
        self.total += other.total;
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CategoryReport {
    pub category: Category,
    pub summary: Summary,
    pub verdicts: Vec<Verdict>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReferenceCounts {
    pub resolved: u32,
    pub unresolved: u32,
    pub external: u32,
}

/// Modguard-specific run payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ModguardData {
    pub profile: String,
    pub files_scanned: u32,
    pub declarations_extracted: u32,
    pub references: ReferenceCounts,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// The durable report document.
///
/// Carries no timestamps: two runs over unchanged input serialize identically.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ModguardReport {
    /// Versioned schema identifier for the document shape.
    pub schema: String,
    pub tool: ToolMeta,
    /// Module directory as given on the command line.
    pub module: String,
    /// `true` iff no verdict in any category has status `fail`.
    pub passed: bool,
    pub summary: Summary,
    pub categories: Vec<CategoryReport>,
    pub data: ModguardData,
}

impl ModguardReport {
    pub fn verdicts(&self) -> impl Iterator<Item = &Verdict> {
        self.categories.iter().flat_map(|c| c.verdicts.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_records_each_status() {
        let mut s = Summary::default();
        s.record(Status::Pass);
        s.record(Status::Warn);
        s.record(Status::Fail);
        s.record(Status::Pass);
        assert_eq!(
            s,
            Summary {
                passed: 2,
                warned: 1,
                failed: 1,
                total: 4
            }
        );
    }

    #[test]
    fn category_serializes_snake_case() {
        let v = serde_json::to_value(Category::TypePattern).expect("serialize");
        assert_eq!(v, "type_pattern");
        for c in Category::ALL {
            assert_eq!(serde_json::to_value(c).expect("serialize"), c.as_str());
        }
    }
}
