// Thin re-export module: implementation is split across `ledger/` submodules
// (block + hashing, mutable state, chain validation).

pub mod block;
pub mod state;
pub mod validation;

pub use block::*;
pub use state::*;
pub use validation::*;
