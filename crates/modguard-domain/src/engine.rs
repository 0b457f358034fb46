use crate::checks::{self, CheckContext};
use crate::model::ModuleModel;
use crate::policy::EffectiveConfig;
use crate::report::{DomainReport, aggregate, overall_passed};
use crate::resolve::{self, Resolver};
use modguard_types::{ModguardData, Verdict};

/// Resolve references, run every enabled rule, aggregate.
///
/// Pure: the same model and config always yield the same report.
pub fn evaluate(model: &ModuleModel, cfg: &EffectiveConfig) -> DomainReport {
    let resolver = Resolver::new(model, &cfg.provider_namespaces);
    let references = resolver.resolve_all(model);

    let ctx = CheckContext {
        model,
        cfg,
        resolver: &resolver,
        references: &references,
    };
    let mut verdicts: Vec<Verdict> = Vec::new();
    checks::run_all(&ctx, &mut verdicts);

    let (categories, summary) = aggregate(verdicts);
    let data = ModguardData {
        profile: cfg.profile.clone(),
        files_scanned: model.files.len() as u32,
        declarations_extracted: model.declarations().count() as u32,
        references: resolve::count(&references),
    };

    DomainReport {
        passed: overall_passed(&categories),
        summary,
        categories,
        data,
    }
}
