//! Report Aggregator: group verdicts by category, preserving rule order.

use modguard_types::{Category, CategoryReport, ModguardData, Status, Summary, Verdict};

#[derive(Clone, Debug)]
pub struct DomainReport {
    /// `true` iff no verdict has status `fail`.
    pub passed: bool,
    pub summary: Summary,
    pub categories: Vec<CategoryReport>,
    pub data: ModguardData,
}

/// Every category gets a section, even an empty one, in report order.
pub fn aggregate(verdicts: Vec<Verdict>) -> (Vec<CategoryReport>, Summary) {
    let mut sections: Vec<CategoryReport> = Category::ALL
        .iter()
        .map(|&category| CategoryReport {
            category,
            summary: Summary::default(),
            verdicts: Vec::new(),
        })
        .collect();

    for verdict in verdicts {
        let section = sections
            .iter_mut()
            .find(|s| s.category == verdict.category)
            .expect("every category has a registered report section");
        section.summary.record(verdict.status);
        section.verdicts.push(verdict);
    }

    let mut total = Summary::default();
    for section in &sections {
        total.absorb(&section.summary);
    }
    (sections, total)
}

pub fn overall_passed(sections: &[CategoryReport]) -> bool {
    sections
        .iter()
        .flat_map(|s| s.verdicts.iter())
        .all(|v| v.status != Status::Fail)
}
