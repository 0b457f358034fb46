//! Data-driven rule table.
//!
//! Each rule is `{ id, category, run }`; the engine walks [`RULES`] in order
//! and a rule never sees another rule's output.

use crate::model::ModuleModel;
use crate::policy::EffectiveConfig;
use crate::resolve::{Reference, Resolver};
use modguard_types::{Category, Verdict, ids};

mod descriptions;
mod duplicates;
mod naming;
mod outputs;
mod references;
mod structure;
mod syntax;
mod type_pattern;
mod utils;
mod versions;


pub use utils::{Emitter, Violation};

/// Read-only inputs shared by every rule.
pub struct CheckContext<'a> {
    pub model: &'a ModuleModel,
    pub cfg: &'a EffectiveConfig,
    pub resolver: &'a Resolver<'a>,
    pub references: &'a [Reference],
}

pub struct Rule {
    pub id: &'static str,
    pub category: Category,
    pub run: fn(&CheckContext<'_>, &mut Emitter<'_>),
}

pub const RULES: &[Rule] = &[
    Rule {
        id: ids::CHECK_STRUCTURE_REQUIRED_FILES,
        category: Category::Structure,
        run: structure::required_files,
    },
    Rule {
        id: ids::CHECK_STRUCTURE_RECOMMENDED_FILES,
        category: Category::Structure,
        run: structure::recommended_files,
    },
    Rule {
        id: ids::CHECK_STRUCTURE_README_SECTIONS,
        category: Category::Structure,
        run: structure::readme_sections,
    },
    Rule {
        id: ids::CHECK_STRUCTURE_SYNTAX,
        category: Category::Structure,
        run: syntax::run,
    },
    Rule {
        id: ids::CHECK_NAMING_CONVENTION,
        category: Category::Naming,
        run: naming::run,
    },
    Rule {
        id: ids::CHECK_NAMING_DUPLICATES,
        category: Category::Naming,
        run: duplicates::run,
    },
    Rule {
        id: ids::CHECK_DESCRIPTION_REQUIRED,
        category: Category::Description,
        run: descriptions::run,
    },
    Rule {
        id: ids::CHECK_TYPE_PATTERN_VALIDATION,
        category: Category::TypePattern,
        run: type_pattern::run,
    },
    Rule {
        id: ids::CHECK_VERSION_CONSTRAINTS,
        category: Category::Version,
        run: versions::run,
    },
    Rule {
        id: ids::CHECK_REFERENCE_RESOLVED,
        category: Category::Reference,
        run: references::unresolved,
    },
    Rule {
        id: ids::CHECK_REFERENCE_UNUSED_VARIABLES,
        category: Category::Reference,
        run: references::unused_variables,
    },
    Rule {
        id: ids::CHECK_OUTPUT_VALUE,
        category: Category::Output,
        run: outputs::run,
    },
];

/// Run every enabled rule in table order.
pub fn run_all(ctx: &CheckContext<'_>, out: &mut Vec<Verdict>) {
    for rule in RULES {
        let Some(policy) = ctx.cfg.check_policy(rule.id) else {
            continue;
        };
        let mut emit = Emitter::new(rule, policy, out);
        (rule.run)(ctx, &mut emit);
    }
}
