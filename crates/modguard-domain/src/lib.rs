//! Pure module evaluation (no IO).
//!
//! Input: a module model built elsewhere (scanner and extractor live in
//! `modguard-parser`, file access in `modguard-repo`).
//! Output: category-grouped verdicts, summary counts and an overall result.

#![forbid(unsafe_code)]

pub mod checks;
pub mod fingerprint;
pub mod model;
pub mod patterns;
pub mod policy;
pub mod report;
pub mod resolve;

mod engine;

#[cfg(test)]
mod proptests;
#[cfg(test)]
mod test_support;

pub use engine::evaluate;
