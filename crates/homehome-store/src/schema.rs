//! Column families used by the `RocksDB` store.

/// Column family names.
pub mod cf {
    /// `CurrencyBalance`, keyed by `user_id`.
    pub const BALANCES: &str = "balances";

    /// `CurrencyTransaction`, keyed by `transaction_id` (ULID).
    pub const TRANSACTIONS: &str = "transactions";

    /// Index: `user_id || transaction_id`, empty value.
    pub const TRANSACTIONS_BY_USER: &str = "transactions_by_user";

    /// `OwnedItem`, keyed by `user_id || item_id`.
    pub const OWNED_ITEMS: &str = "owned_items";

    /// `PityState`, keyed by `user_id`.
    pub const GACHA_PITY: &str = "gacha_pity";

    /// `AffectionState`, keyed by `user_id || character_id`.
    pub const AFFECTION: &str = "affection";

    /// `LoginStreakState`, keyed by `user_id`.
    pub const LOGIN_STREAKS: &str = "login_streaks";

    /// Consumed idempotency keys, keyed by `user_id || key`.
    pub const REQUEST_KEYS: &str = "request_keys";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        cf::BALANCES,
        cf::TRANSACTIONS,
        cf::TRANSACTIONS_BY_USER,
        cf::OWNED_ITEMS,
        cf::GACHA_PITY,
        cf::AFFECTION,
        cf::LOGIN_STREAKS,
        cf::REQUEST_KEYS,
    ]
}
