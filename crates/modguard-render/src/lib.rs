//! Rendering utilities for the console, the durable Markdown report, and CI surfaces.
//!
//! Renderers are pure string builders over [`RenderableReport`]. They never
//! print timestamps or anything else that varies between runs.

#![forbid(unsafe_code)]

mod console;
mod gha;
mod markdown;
mod model;

pub use console::render_console;
pub use gha::render_github_annotations;
pub use markdown::render_markdown;
pub use model::{
    RenderableLocation, RenderableReport, RenderableSection, RenderableStatus, RenderableSummary,
    RenderableVerdict,
};
