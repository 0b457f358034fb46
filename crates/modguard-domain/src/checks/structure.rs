use super::{CheckContext, Emitter, Violation};
use modguard_types::{Location, RepoPath, ids};
use serde_json::json;

/// Lowercased text of every Markdown heading line (`# ...`, `## ...`).
fn headings(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim_start)
        .filter(|l| l.starts_with('#'))
        .map(|l| l.trim_start_matches('#').trim().to_lowercase())
        .collect()
}

/// A required file counts only when it was scanned; an excluded or
/// mis-extensioned file on disk does not.
pub fn required_files(ctx: &CheckContext<'_>, emit: &mut Emitter<'_>) {
    for name in &ctx.cfg.required_files {
        let location = Some(Location::file(&RepoPath::new(name)));
        if ctx.model.file(name).is_some() {
            emit.pass(name, format!("{name} present"), location);
        } else {
            let message = if ctx.model.has_entry(name) {
                format!("required file {name} exists but was not scanned")
            } else {
                format!("required file {name} is missing")
            };
            emit.violation(Violation {
                code: ids::CODE_MISSING_REQUIRED_FILE,
                target: name.clone(),
                message,
                location,
                help: Some(format!("Create {name} in the module root.")),
                data: json!({ "file": name }),
            });
        }
    }
}

pub fn recommended_files(ctx: &CheckContext<'_>, emit: &mut Emitter<'_>) {
    for name in &ctx.cfg.recommended_files {
        if ctx.model.has_entry(name) {
            emit.pass(name, format!("{name} present"), None);
        } else {
            let what = if name.ends_with('/') { "directory" } else { "file" };
            emit.violation(Violation {
                code: ids::CODE_MISSING_RECOMMENDED_FILE,
                target: name.clone(),
                message: format!("recommended {what} {name} is missing"),
                location: None,
                help: None,
                data: json!({ "entry": name }),
            });
        }
    }
}

/// Each configured section must appear as a README heading. Silent when the
/// README is absent: `recommended_files` already reports that.
pub fn readme_sections(ctx: &CheckContext<'_>, emit: &mut Emitter<'_>) {
    let readme = &ctx.cfg.readme_file;
    let Some(text) = ctx.model.document(readme) else {
        return;
    };
    let headings = headings(text);
    let location = Some(Location::file(&RepoPath::new(readme)));

    for section in &ctx.cfg.readme_sections {
        let target = format!("{readme}#{}", section.name);
        let found = headings
            .iter()
            .find(|h| section.keywords.iter().any(|k| h.contains(k.as_str())));
        match found {
            Some(heading) => emit.pass(target, format!("heading \"{heading}\""), location.clone()),
            None => emit.violation(Violation {
                code: ids::CODE_MISSING_README_SECTION,
                target,
                message: format!("{readme} has no {} section", section.name),
                location: location.clone(),
                help: Some(format!(
                    "Add a heading containing one of: {}.",
                    section.keywords.join(", ")
                )),
                data: json!({ "section": section.name, "keywords": section.keywords }),
            }),
        }
    }
}
