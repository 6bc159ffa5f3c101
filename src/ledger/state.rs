//! Mutable ledger state: the authoritative chain, the pending-transaction
//! pool, and the registered peer list.
//!
//! `Ledger` is the single shared mutable resource of the node. Callers wrap
//! it in `Arc<tokio::sync::RwLock<_>>`; every method here runs under one
//! guard acquisition, so a mint can never be observed half-applied and a
//! chain replacement never races an append. The proof-of-work search itself
//! must run outside any guard (see the mine handler).

use super::block::{Block, Transaction};
use crate::error::{ChainError, Result};

pub struct Ledger {
    node_id: String,
    chain: Vec<Block>,
    pending: Vec<Transaction>,
    peers: Vec<String>,
}

impl Ledger {
    /// Create a ledger whose chain holds only a fresh genesis block.
    pub fn new(node_id: impl Into<String>) -> Self {
        Ledger {
            node_id: node_id.into(),
            chain: vec![Block::genesis()],
            pending: Vec::new(),
            peers: Vec::new(),
        }
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    pub fn peers(&self) -> &[String] {
        &self.peers
    }

    pub fn last_block(&self) -> Result<&Block> {
        self.chain.last().ok_or(ChainError::EmptyChain)
    }

    /// Register a peer address. No validation and no dedup: duplicate
    /// registrations are kept, matching the baseline wire behavior, and only
    /// cost a redundant fetch during conflict resolution.
    pub fn register_peer(&mut self, address: impl Into<String>) {
        self.peers.push(address.into());
    }

    /// Queue a transaction for the next minted block. Contents are not
    /// validated.
    pub fn queue_transaction(&mut self, tx: Transaction) {
        self.pending.push(tx);
    }

    /// Append a new block carrying the entire pending pool and the given
    /// proof, then clear the pool. Single `&mut self` call, so under the
    /// caller's write guard the append and the pool drain are one atomic
    /// step.
    pub fn mint_block(&mut self, proof: u64) -> Result<Block> {
        let previous_hash = self.last_block()?.hash()?;
        let block = Block {
            index: self.chain.len() as u64,
            timestamp: chrono::Utc::now().timestamp(),
            transactions: std::mem::take(&mut self.pending),
            proof,
            previous_hash,
        };
        self.chain.push(block.clone());
        Ok(block)
    }

    /// Wholesale chain replacement. Only the conflict resolver calls this,
    /// after validating `new_chain`.
    pub fn replace_chain(&mut self, new_chain: Vec<Block>) {
        self.chain = new_chain;
    }
}
