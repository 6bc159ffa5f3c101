//! REST API server for minichain.
//!
//! Thin transport glue over the ledger core: request parsing, the mine loop
//! orchestration, and JSON responses. Route names match the original wire
//! protocol so nodes can resolve conflicts against each other.

use axum::{
    extract::{Request, State},
    http::{self, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::error::ChainError;
use crate::ledger::{Block, Ledger, Transaction};
use crate::pow::find_proof;
use crate::sync::{ConflictResolver, FullChainResponse};

/// Sender string carried by mining-reward transactions.
const REWARD_SENDER: &str = "0";
/// Reward paid to this node for each minted block.
const REWARD_AMOUNT: u64 = 1;

/// Shared handler state: the lock-guarded ledger plus the resolver.
#[derive(Clone)]
pub struct ApiState {
    pub ledger: Arc<RwLock<Ledger>>,
    pub resolver: Arc<ConflictResolver>,
}

impl ApiState {
    pub fn new(ledger: Arc<RwLock<Ledger>>) -> Result<Self, ChainError> {
        Ok(ApiState {
            ledger,
            resolver: Arc::new(ConflictResolver::new()?),
        })
    }
}

// ============================================================================
// API Error Handling
// ============================================================================

#[derive(Debug)]
pub enum ApiError {
    NothingToMine,
    ChainError(ChainError),
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NothingToMine => (
                StatusCode::BAD_REQUEST,
                "no pending transactions to mine".to_string(),
            ),
            ApiError::ChainError(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            ApiError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<ChainError> for ApiError {
    fn from(err: ChainError) -> Self {
        ApiError::ChainError(err)
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct RegisterNodeRequest {
    pub node: String,
}

#[derive(Serialize)]
struct RegisterNodeResponse {
    nodes: Vec<String>,
}

#[derive(Serialize)]
struct SuccessResponse {
    message: String,
}

#[derive(Serialize)]
struct ResolveResponse {
    replaced: bool,
    chain: Vec<Block>,
}

// ============================================================================
// Middleware
// ============================================================================

/// Request logging middleware: method, path, status, duration.
async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    info!(
        method = %method,
        path = %path,
        status = %response.status().as_u16(),
        duration_ms = %start.elapsed().as_millis(),
        "api.request"
    );

    response
}

// ============================================================================
// API Server
// ============================================================================

/// Build the router with all endpoints (also used by tests).
pub fn build_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(vec![http::Method::GET, http::Method::POST])
        .allow_headers(vec![http::header::CONTENT_TYPE]);

    Router::new()
        .route("/fullChain", get(get_full_chain))
        .route("/newTransaction", post(new_transaction))
        .route("/mine", post(mine))
        .route("/registerNode", post(register_node))
        .route("/resolveConflicts", post(resolve_conflicts))
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
        .layer(cors)
}

/// Bind and serve until the process exits.
pub async fn run_api_server(
    state: ApiState,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(%addr, "API server listening");

    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

// ============================================================================
// Route Handlers
// ============================================================================

async fn get_full_chain(State(state): State<ApiState>) -> Json<FullChainResponse> {
    let guard = state.ledger.read().await;
    Json(FullChainResponse {
        chain: guard.chain().to_vec(),
        len: guard.chain().len(),
        transactions: guard.pending().to_vec(),
        nodes: guard.peers().to_vec(),
    })
}

async fn new_transaction(
    State(state): State<ApiState>,
    Json(tx): Json<Transaction>,
) -> Json<SuccessResponse> {
    let mut guard = state.ledger.write().await;
    let target_index = guard.chain().len();
    guard.queue_transaction(tx);

    Json(SuccessResponse {
        message: format!("transaction will be included in block {}", target_index),
    })
}

/// Run the proof-of-work search and mint the pending pool into a new block.
///
/// The search runs on a blocking thread against a snapshot of the tail
/// proof, with no ledger lock held. If the tail moved while searching (a
/// concurrent mint or a chain replacement), the search is retried against
/// the new tail so the minted block always extends the chain it lands on.
async fn mine(State(state): State<ApiState>) -> Result<Json<Block>, ApiError> {
    {
        let guard = state.ledger.read().await;
        if guard.pending().is_empty() {
            return Err(ApiError::NothingToMine);
        }
    }

    let block = loop {
        let reference = state.ledger.read().await.last_block()?.proof;

        let proof = tokio::task::spawn_blocking(move || find_proof(reference))
            .await
            .map_err(|e| ApiError::InternalError(format!("proof search panicked: {}", e)))?;

        let mut guard = state.ledger.write().await;
        if guard.last_block()?.proof != reference {
            info!(stale_reference = reference, "chain tail moved during proof search, retrying");
            continue;
        }

        // A concurrent mine may have drained the pool while this request was
        // searching; re-check under the write lock so a block never carries
        // only its own reward.
        if guard.pending().is_empty() {
            return Err(ApiError::NothingToMine);
        }

        let reward = Transaction {
            sender: REWARD_SENDER.to_string(),
            recipient: guard.node_id().to_string(),
            amount: REWARD_AMOUNT,
        };
        guard.queue_transaction(reward);

        break guard.mint_block(proof)?;
    };

    info!(index = block.index, proof = block.proof, "minted new block");
    Ok(Json(block))
}

async fn register_node(
    State(state): State<ApiState>,
    Json(req): Json<RegisterNodeRequest>,
) -> Json<RegisterNodeResponse> {
    let mut guard = state.ledger.write().await;
    guard.register_peer(req.node);

    Json(RegisterNodeResponse {
        nodes: guard.peers().to_vec(),
    })
}

async fn resolve_conflicts(State(state): State<ApiState>) -> Json<ResolveResponse> {
    let replaced = state.resolver.resolve(&state.ledger).await;
    let guard = state.ledger.read().await;

    Json(ResolveResponse {
        replaced,
        chain: guard.chain().to_vec(),
    })
}
