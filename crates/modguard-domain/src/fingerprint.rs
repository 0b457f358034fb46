use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a non-pass verdict.
///
/// Identity fields:
/// - check_id
/// - code
/// - file path (module-relative, empty when the verdict has no location)
/// - target
pub fn fingerprint_for_verdict(check_id: &str, code: &str, path: &str, target: &str) -> String {
    let canonical = [check_id, code, path, target].join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}
