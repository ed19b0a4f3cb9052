//! Key encoding for the column families.
//!
//! Every per-user key starts with the 16 UUID bytes of the user, so a prefix
//! scan over `user_prefix` visits exactly that user's rows.

use homehome_core::{CharacterId, IdempotencyKey, ItemId, TransactionId, UserId};

const ID_LEN: usize = 16;

/// Prefix shared by every per-user key. Also the full key for one-per-user
/// records (balance, pity, streak).
#[must_use]
pub fn user_prefix(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Upper bound for a reverse scan over one user's composite keys.
#[must_use]
pub fn user_prefix_end(user_id: &UserId) -> Vec<u8> {
    let mut key = user_prefix(user_id);
    key.extend_from_slice(&[0xFF; ID_LEN]);
    key
}

/// Create a transaction key from a transaction ID.
#[must_use]
pub fn transaction_key(transaction_id: &TransactionId) -> Vec<u8> {
    transaction_id.to_bytes().to_vec()
}

/// Create a user-transaction index key.
///
/// Format: `user_id (16 bytes) || transaction_id (16 bytes)`
///
/// Since ULIDs are time-ordered, transactions for a user will be sorted by time.
#[must_use]
pub fn user_transaction_key(user_id: &UserId, transaction_id: &TransactionId) -> Vec<u8> {
    let mut key = Vec::with_capacity(2 * ID_LEN);
    key.extend_from_slice(user_id.as_bytes());
    key.extend_from_slice(&transaction_id.to_bytes());
    key
}

/// Extract the transaction ID from a user-transaction index key.
///
/// Returns `None` for a key of the wrong length.
#[must_use]
pub fn transaction_id_from_user_key(key: &[u8]) -> Option<TransactionId> {
    let bytes: [u8; ID_LEN] = key.get(ID_LEN..2 * ID_LEN)?.try_into().ok()?;
    Some(TransactionId::from_bytes(bytes))
}

/// Owned item key: `user_id || item_id`.
#[must_use]
pub fn owned_item_key(user_id: &UserId, item_id: &ItemId) -> Vec<u8> {
    let mut key = Vec::with_capacity(2 * ID_LEN);
    key.extend_from_slice(user_id.as_bytes());
    key.extend_from_slice(item_id.as_bytes());
    key
}

/// Affection key: `user_id || character_id`.
#[must_use]
pub fn affection_key(user_id: &UserId, character_id: &CharacterId) -> Vec<u8> {
    let mut key = Vec::with_capacity(ID_LEN + character_id.as_str().len());
    key.extend_from_slice(user_id.as_bytes());
    key.extend_from_slice(character_id.as_str().as_bytes());
    key
}

/// Request key: `user_id || idempotency_key`.
#[must_use]
pub fn request_key(user_id: &UserId, idempotency_key: &IdempotencyKey) -> Vec<u8> {
    let mut key = Vec::with_capacity(ID_LEN + idempotency_key.as_str().len());
    key.extend_from_slice(user_id.as_bytes());
    key.extend_from_slice(idempotency_key.as_str().as_bytes());
    key
}
