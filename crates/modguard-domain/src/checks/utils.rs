use super::Rule;
use crate::fingerprint::fingerprint_for_verdict;
use crate::policy::CheckPolicy;
use globset::{Glob, GlobSet, GlobSetBuilder};
use modguard_types::{Category, Location, Status, Verdict, ids};
use serde_json::Value;

pub fn build_allowlist(allow: &[String]) -> Option<GlobSet> {
    if allow.is_empty() {
        return None;
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in allow {
        // Treat allowlist entries as glob patterns (case-sensitive).
        let glob =
            Glob::new(pattern).expect("allowlist patterns must be validated in modguard-settings");
        builder.add(glob);
    }
    Some(
        builder
            .build()
            .expect("allowlist patterns must be validated in modguard-settings"),
    )
}

pub fn is_allowed(allow: Option<&GlobSet>, value: &str) -> bool {
    allow.map(|set| set.is_match(value)).unwrap_or(false)
}

/// A rule violation before policy is applied.
#[derive(Debug, Default)]
pub struct Violation {
    pub code: &'static str,
    pub target: String,
    pub message: String,
    pub location: Option<Location>,
    pub help: Option<String>,
    pub data: Value,
}

/// Stamps rule identity and policy onto verdicts.
pub struct Emitter<'a> {
    check_id: &'static str,
    category: Category,
    policy: &'a CheckPolicy,
    allow: Option<GlobSet>,
    out: &'a mut Vec<Verdict>,
}

impl<'a> Emitter<'a> {
    pub fn new(rule: &Rule, policy: &'a CheckPolicy, out: &'a mut Vec<Verdict>) -> Self {
        Self {
            check_id: rule.id,
            category: rule.category,
            policy,
            allow: build_allowlist(&policy.allow),
            out,
        }
    }

    pub fn pass(
        &mut self,
        target: impl Into<String>,
        message: impl Into<String>,
        location: Option<Location>,
    ) {
        self.out.push(Verdict {
            check_id: self.check_id.to_string(),
            code: ids::CODE_OK.to_string(),
            category: self.category,
            status: Status::Pass,
            target: target.into(),
            message: message.into(),
            location,
            help: None,
            fingerprint: None,
            data: Value::Null,
        });
    }

    /// Record a violation at the policy's severity unless its target is allow-listed.
    pub fn violation(&mut self, v: Violation) {
        if is_allowed(self.allow.as_ref(), &v.target) {
            return;
        }
        let path = v
            .location
            .as_ref()
            .map(|l| l.path.as_str())
            .unwrap_or_default();
        let fingerprint = fingerprint_for_verdict(self.check_id, v.code, path, &v.target);
        self.out.push(Verdict {
            check_id: self.check_id.to_string(),
            code: v.code.to_string(),
            category: self.category,
            status: self.policy.severity.status(),
            target: v.target,
            message: v.message,
            location: v.location,
            help: v.help,
            fingerprint: Some(fingerprint),
            data: v.data,
        });
    }
}
