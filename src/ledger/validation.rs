use crate::ledger::block::Block;
use crate::pow::verify_proof;

/// Check hash-linkage and proof-of-work continuity across the whole chain.
///
/// A chain of length 0 or 1 is trivially valid. Pure function, safe to call
/// concurrently. A block that fails to serialize for hashing makes the chain
/// invalid rather than aborting the caller.
pub fn is_valid_chain(chain: &[Block]) -> bool {
    for pair in chain.windows(2) {
        let (prev, cur) = (&pair[0], &pair[1]);
        let prev_hash = match prev.hash() {
            Ok(hash) => hash,
            Err(_) => return false,
        };
        if cur.previous_hash != prev_hash {
            return false;
        }
        if !verify_proof(prev.proof, cur.proof) {
            return false;
        }
    }
    true
}
