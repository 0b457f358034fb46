use super::{CheckContext, Emitter, Violation};
use crate::model::{Declaration, DeclarationKind, literal_text};
use modguard_types::{Location, ids};
use serde_json::json;
use std::collections::HashMap;

/// Providers may repeat under distinct aliases.
fn identity(decl: &Declaration) -> String {
    match decl.kind {
        DeclarationKind::Provider => match decl.attribute("alias") {
            Some(alias) => format!("{}#{}", decl.address(), literal_text(&alias.value)),
            None => decl.address(),
        },
        _ => decl.address(),
    }
}

pub fn run(ctx: &CheckContext<'_>, emit: &mut Emitter<'_>) {
    let mut groups: Vec<Vec<&Declaration>> = Vec::new();
    let mut slot: HashMap<String, usize> = HashMap::new();

    for decl in ctx.model.declarations() {
        // Multiple `terraform` blocks are legal.
        if decl.kind == DeclarationKind::Settings {
            continue;
        }
        let key = identity(decl);
        match slot.get(&key) {
            Some(&i) => groups[i].push(decl),
            None => {
                slot.insert(key, groups.len());
                groups.push(vec![decl]);
            }
        }
    }

    for group in groups {
        let first = group[0];
        let address = first.address();
        if group.len() == 1 {
            emit.pass(
                address,
                "declared once",
                Some(Location::line(&first.file, first.span.start)),
            );
            continue;
        }

        let dup = group[1];
        let sites: Vec<String> = group
            .iter()
            .map(|d| format!("{}:{}", d.file, d.span.start))
            .collect();
        emit.violation(Violation {
            code: ids::CODE_DUPLICATE_DECLARATION,
            target: address.clone(),
            message: format!(
                "{address} is declared {} times ({}); references resolve to the first",
                group.len(),
                sites.join(", ")
            ),
            location: Some(Location::line(&dup.file, dup.span.start)),
            help: Some("Remove or rename the extra declarations.".to_string()),
            data: json!({ "occurrences": sites }),
        });
    }
}
