//! Proof-of-work puzzle: find a candidate whose hash, combined with the
//! previous block's proof, meets the difficulty target.

use sha2::{Digest, Sha256};

/// Required prefix of the hex digest. Two hex zeros = 8 leading zero bits.
/// The search loop never inspects this directly, so tuning difficulty is a
/// one-line change.
pub const DIFFICULTY_PREFIX: &str = "00";

/// Check whether `candidate` is a valid proof against `reference`.
///
/// Hashes the concatenated decimal string forms of both proofs. Pure
/// predicate: same inputs always yield the same answer.
pub fn verify_proof(reference: u64, candidate: u64) -> bool {
    let payload = format!("{}{}", reference, candidate);
    let digest = Sha256::digest(payload.as_bytes());
    hex::encode(digest).starts_with(DIFFICULTY_PREFIX)
}

/// Linear scan from 0 for the smallest valid proof against `reference`.
///
/// CPU-bound and blocking with no time bound; callers on an async runtime
/// should run it via `tokio::task::spawn_blocking` and must not hold the
/// ledger lock while it runs.
pub fn find_proof(reference: u64) -> u64 {
    // The scan cannot fail, so the never-stop closure cannot return None.
    find_proof_with(reference, || false).unwrap_or_default()
}

/// Cancellable variant of [`find_proof`]. `should_stop` is polled between
/// candidates, after each failed verification: a candidate that already
/// satisfies the predicate is returned even when the signal is set, and
/// `None` is returned once the signal is observed first.
pub fn find_proof_with(reference: u64, should_stop: impl Fn() -> bool) -> Option<u64> {
    let mut candidate: u64 = 0;
    loop {
        if verify_proof(reference, candidate) {
            return Some(candidate);
        }
        if should_stop() {
            return None;
        }
        candidate += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_is_a_pure_predicate() {
        let first = verify_proof(100, 35293);
        for _ in 0..10 {
            assert_eq!(verify_proof(100, 35293), first);
        }
    }

    #[test]
    fn found_proof_verifies() {
        let proof = find_proof(1);
        assert!(verify_proof(1, proof));
    }

    #[test]
    fn found_proof_is_the_smallest() {
        let proof = find_proof(42);
        for candidate in 0..proof {
            assert!(!verify_proof(42, candidate));
        }
        assert!(verify_proof(42, proof));
    }

    #[test]
    fn cancellation_stops_the_scan() {
        // A stop signal that fires immediately aborts unless candidate 0 wins.
        let result = find_proof_with(7, || true);
        if let Some(proof) = result {
            assert_eq!(proof, 0);
        }
    }
}
