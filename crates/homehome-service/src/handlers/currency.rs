//! Currency balance, history and ledger mutation handlers.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use homehome_core::{source, CurrencyTransaction, TransactionKind, UserId};
use homehome_store::{Store, MAX_TRANSACTION_PAGE};

use super::{idempotency_key, BalanceResponse};
use crate::auth::{AuthUser, ServiceAuth};
use crate::error::ApiError;
use crate::state::AppState;

/// Get current balance.
pub async fn get_balance(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<BalanceResponse>, ApiError> {
    let balance = state.store.balance(&auth.user_id)?;
    Ok(Json(balance.into()))
}

/// Transaction list query parameters.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// Maximum number of transactions to return (default: 50).
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    50
}

/// Transaction response.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// Transaction ID.
    pub id: String,
    /// `earn` or `spend`.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Unsigned amount.
    pub amount: u64,
    /// Source tag.
    pub source: String,
    /// Total balance after this transaction.
    pub balance_after: u64,
    /// Free-form context.
    pub metadata: serde_json::Value,
    /// Timestamp.
    pub created_at: String,
}

impl From<CurrencyTransaction> for TransactionResponse {
    fn from(tx: CurrencyTransaction) -> Self {
        Self {
            id: tx.id.to_string(),
            kind: tx.kind,
            amount: tx.amount,
            source: tx.source,
            balance_after: tx.balance_after,
            metadata: tx.metadata,
            created_at: tx.created_at.to_rfc3339(),
        }
    }
}

/// List transactions response.
#[derive(Debug, Serialize)]
pub struct ListTransactionsResponse {
    /// Transactions (newest first).
    pub transactions: Vec<TransactionResponse>,
    /// Whether there are more transactions.
    pub has_more: bool,
}

/// List transaction history.
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(query): Query<ListTransactionsQuery>,
) -> Result<Json<ListTransactionsResponse>, ApiError> {
    // One extra row tells us whether another page exists.
    let limit = query.limit.min(MAX_TRANSACTION_PAGE);
    let transactions = state
        .store
        .list_transactions_by_user(&auth.user_id, limit + 1, query.offset)?;

    let has_more = transactions.len() > limit;
    let transactions: Vec<_> = transactions
        .into_iter()
        .take(limit)
        .map(TransactionResponse::from)
        .collect();

    Ok(Json(ListTransactionsResponse {
        transactions,
        has_more,
    }))
}

/// Debit request.
#[derive(Debug, Deserialize)]
pub struct DebitRequest {
    /// Coins to spend.
    pub amount: u64,
    /// What the coins are spent on.
    pub source: String,
    /// Optional context stored with the transaction.
    #[serde(default)]
    pub metadata: serde_json::Value,
    /// Optional retry key.
    #[serde(default)]
    pub idempotency_key: Option<String>,
}

/// Spend coins, free coins first.
pub async fn debit(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<DebitRequest>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let key = idempotency_key(body.idempotency_key.as_deref())?;
    let balance = state.store.debit(
        &auth.user_id,
        body.amount,
        &body.source,
        body.metadata,
        key.as_ref(),
    )?;
    Ok(Json(balance.into()))
}

/// Service-side credit request.
#[derive(Debug, Deserialize)]
pub struct CreditRequest {
    /// Recipient.
    pub user_id: String,
    /// Coins to add.
    pub amount: u64,
    /// Source tag; defaults to `purchase` for paid credits.
    #[serde(default)]
    pub source: Option<String>,
    /// Optional context stored with the transaction.
    #[serde(default)]
    pub metadata: serde_json::Value,
    /// Optional retry key.
    #[serde(default)]
    pub idempotency_key: Option<String>,
}

/// Credit reward (free) coins, e.g. for a diary entry or a breathing session.
pub async fn credit(
    State(state): State<Arc<AppState>>,
    service: ServiceAuth,
    Json(body): Json<CreditRequest>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let user_id: UserId = body.user_id.parse()?;
    let source = body
        .source
        .ok_or_else(|| ApiError::BadRequest("source is required".into()))?;
    let key = idempotency_key(body.idempotency_key.as_deref())?;

    tracing::debug!(service = %service.service_name, %user_id, amount = body.amount, "Reward credit");
    let balance = state
        .store
        .credit(&user_id, body.amount, &source, body.metadata, key.as_ref())?;
    Ok(Json(balance.into()))
}

/// Credit purchased coins. Called by the billing collaborator.
pub async fn credit_paid(
    State(state): State<Arc<AppState>>,
    service: ServiceAuth,
    Json(body): Json<CreditRequest>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let user_id: UserId = body.user_id.parse()?;
    let source = body.source.unwrap_or_else(|| source::PURCHASE.to_string());
    let key = idempotency_key(body.idempotency_key.as_deref())?;

    tracing::debug!(service = %service.service_name, %user_id, amount = body.amount, "Paid credit");
    let balance = state
        .store
        .credit_paid(&user_id, body.amount, &source, body.metadata, key.as_ref())?;
    Ok(Json(balance.into()))
}
