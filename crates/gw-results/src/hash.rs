//! Content digests for input artifacts.

use sha2::{Digest, Sha256};

/// Hex SHA-256 of the artifact bytes plus the solver version.
pub fn compute_input_digest(input: &[u8], solver_version: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input);
    hasher.update(solver_version.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_stability() {
        let a = compute_input_digest(b"2000\n2000\n1\n", "v1");
        let b = compute_input_digest(b"2000\n2000\n1\n", "v1");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn hash_differs_for_different_inputs() {
        let base = compute_input_digest(b"-4E05 -4E05", "v1");
        assert_ne!(base, compute_input_digest(b"-4E05 6E05", "v1"));
        assert_ne!(base, compute_input_digest(b"-4E05 -4E05", "v2"));
    }
}
