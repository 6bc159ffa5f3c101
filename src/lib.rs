//! minichain - A minimal single-node proof-of-work ledger with
//! longest-chain conflict resolution
//!
//! # Architecture
//!
//! ## Core Ledger
//! - [`ledger`] - Blocks, canonical hashing, ledger state, chain validation
//!
//! ## Consensus
//! - [`pow`] - Proof-of-work search and verification
//! - [`sync`] - Peer chain fetch and longest-valid-chain conflict resolution
//!
//! ## Transport & Utilities
//! - [`api`] - REST API server
//! - [`config`] - Configuration management
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Core Ledger
// ============================================================================
pub mod ledger;

// ============================================================================
// Consensus
// ============================================================================
pub mod pow;
pub mod sync;

// ============================================================================
// Transport
// ============================================================================
pub mod api;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;
