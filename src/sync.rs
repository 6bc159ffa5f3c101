//! Conflict resolution against peer nodes.
//!
//! Implements the longest-valid-chain rule: fetch every registered peer's
//! full chain, discard unreachable/malformed/inconsistent responses, and
//! adopt a peer chain only if it is strictly longer than the local chain at
//! the start of the pass and passes full validation. Individual peer
//! failures are logged and skipped; the pass itself always completes.

use crate::error::{ChainError, Result};
use crate::ledger::block::null_as_empty;
use crate::ledger::{is_valid_chain, Block, Ledger, Transaction};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{info, warn};

const PEER_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Wire shape of `GET /fullChain`, shared by the inbound handler and the
/// outbound peer fetch. Conflict resolution consumes only `chain` and `len`.
/// Peers on the original implementation marshal empty pools and peer lists
/// as `null`, hence the null-tolerant deserializers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullChainResponse {
    pub chain: Vec<Block>,
    pub len: usize,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub transactions: Vec<Transaction>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub nodes: Vec<String>,
}

/// A peer's reported chain, as far as resolution cares.
#[derive(Debug, Clone)]
pub struct PeerReport {
    pub chain: Vec<Block>,
    pub len: usize,
}

/// Outbound HTTP client for peer chain fetches.
pub struct PeerClient {
    http: reqwest::Client,
}

impl PeerClient {
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(PEER_FETCH_TIMEOUT)
            .build()?;
        Ok(PeerClient { http })
    }

    /// `GET <address>/fullChain`, parsed into a [`PeerReport`].
    pub async fn fetch_full_chain(&self, address: &str) -> Result<PeerReport> {
        let url = format!("{}/fullChain", address.trim_end_matches('/'));
        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ChainError::NetworkError(format!(
                "{} returned {}",
                url,
                response.status()
            )));
        }
        let body: FullChainResponse = response
            .json()
            .await
            .map_err(|e| ChainError::MalformedPeerResponse(e.to_string()))?;
        Ok(PeerReport {
            chain: body.chain,
            len: body.len,
        })
    }
}

/// Fold per-peer fetch results into the best replacement candidate.
///
/// A candidate wins only if its reported `len` matches the blocks actually
/// sent, it is strictly longer than the best length seen so far (seeded with
/// the local length), and the chain validates. Failed fetches are skipped.
/// Ties never win. Returns `None` when the local chain should be kept.
pub fn select_best_chain<I>(local_len: usize, reports: I) -> Option<Vec<Block>>
where
    I: IntoIterator<Item = Result<PeerReport>>,
{
    let mut best: Option<Vec<Block>> = None;
    let mut best_len = local_len;

    for report in reports {
        let report = match report {
            Ok(report) => report,
            Err(e) => {
                warn!(error = %e, "skipping peer during conflict resolution");
                continue;
            }
        };
        if report.len != report.chain.len() {
            warn!(
                reported = report.len,
                actual = report.chain.len(),
                "skipping peer with inconsistent chain length"
            );
            continue;
        }
        if report.len > best_len && is_valid_chain(&report.chain) {
            best_len = report.len;
            best = Some(report.chain);
        }
    }

    best
}

/// Drives a full resolution pass against all registered peers.
pub struct ConflictResolver {
    client: PeerClient,
}

impl ConflictResolver {
    pub fn new() -> Result<Self> {
        Ok(ConflictResolver {
            client: PeerClient::new()?,
        })
    }

    /// Run one resolution pass. Returns true if the local chain was
    /// replaced. Never fails: peer errors are skipped and the pass always
    /// reaches the replace-or-keep decision.
    ///
    /// Peers and the starting chain length are snapshotted up front; the
    /// ledger lock is not held across any network call.
    pub async fn resolve(&self, ledger: &RwLock<Ledger>) -> bool {
        let (peers, start_len) = {
            let guard = ledger.read().await;
            (guard.peers().to_vec(), guard.chain().len())
        };

        let mut reports = Vec::with_capacity(peers.len());
        for peer in &peers {
            reports.push(self.client.fetch_full_chain(peer).await);
        }

        match select_best_chain(start_len, reports) {
            Some(chain) if chain.len() > start_len => {
                info!(
                    old_len = start_len,
                    new_len = chain.len(),
                    "adopting longer valid peer chain"
                );
                ledger.write().await.replace_chain(chain);
                true
            }
            _ => false,
        }
    }
}
