//! Staging of one operation's writes.
//!
//! A `UnitOfWork` carries the user's balance in memory and stages every
//! ledger entry and record update into a single `WriteBatch`. Nothing reaches
//! the database until [`UnitOfWork::commit`]; dropping the unit discards it.

use chrono::{DateTime, Utc};
use rocksdb::WriteBatch;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use homehome_core::{
    validate_source, BalanceSnapshot, CurrencyBalance, CurrencyTransaction, IdempotencyKey,
    UserId,
};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::rocks::{serialize, RocksStore};
use crate::schema::cf;

/// Value stored under a consumed idempotency key.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct RequestRecord {
    pub operation: String,
    pub recorded_at: DateTime<Utc>,
}

pub(crate) struct UnitOfWork<'a> {
    store: &'a RocksStore,
    user_id: UserId,
    balance: CurrencyBalance,
    balance_dirty: bool,
    entries: usize,
    batch: WriteBatch,
}

impl<'a> UnitOfWork<'a> {
    /// Load the user's balance and start an empty batch.
    ///
    /// The caller must already hold the user's lock.
    pub fn begin(store: &'a RocksStore, user_id: UserId) -> Result<Self> {
        let balance = store
            .read(cf::BALANCES, &keys::user_prefix(&user_id))?
            .unwrap_or_else(|| CurrencyBalance::empty(user_id));
        Ok(Self {
            store,
            user_id,
            balance,
            balance_dirty: false,
            entries: 0,
            batch: WriteBatch::default(),
        })
    }

    /// Fail on a replayed key, otherwise stage its record.
    pub fn reserve_request(
        &mut self,
        idempotency_key: Option<&IdempotencyKey>,
        operation: &str,
    ) -> Result<()> {
        let Some(idempotency_key) = idempotency_key else {
            return Ok(());
        };
        let key = keys::request_key(&self.user_id, idempotency_key);
        if self.store.exists(cf::REQUEST_KEYS, &key)? {
            return Err(StoreError::DuplicateRequest {
                key: idempotency_key.to_string(),
            });
        }
        let record = RequestRecord {
            operation: operation.to_owned(),
            recorded_at: Utc::now(),
        };
        self.put(cf::REQUEST_KEYS, &key, &record)
    }

    pub fn credit_free(&mut self, amount: u64, source: &str, metadata: Value) -> Result<()> {
        validate_source(source)?;
        self.balance.credit_free(amount)?;
        self.record(CurrencyTransaction::earn(
            self.user_id,
            amount,
            source,
            self.balance.total(),
            metadata,
        ))
    }

    pub fn credit_paid(&mut self, amount: u64, source: &str, metadata: Value) -> Result<()> {
        validate_source(source)?;
        self.balance.credit_paid(amount)?;
        self.record(CurrencyTransaction::earn(
            self.user_id,
            amount,
            source,
            self.balance.total(),
            metadata,
        ))
    }

    pub fn debit(&mut self, amount: u64, source: &str, metadata: Value) -> Result<()> {
        validate_source(source)?;
        let split = self.balance.debit(amount)?;
        debug!(
            user_id = %self.user_id,
            amount,
            from_free = split.from_free,
            from_paid = split.from_paid,
            source,
            "debit staged"
        );
        self.record(CurrencyTransaction::spend(
            self.user_id,
            amount,
            source,
            self.balance.total(),
            metadata,
        ))
    }

    fn record(&mut self, transaction: CurrencyTransaction) -> Result<()> {
        self.put(
            cf::TRANSACTIONS,
            &keys::transaction_key(&transaction.id),
            &transaction,
        )?;
        let cf_by_user = self.store.cf(cf::TRANSACTIONS_BY_USER)?;
        self.batch.put_cf(
            &cf_by_user,
            keys::user_transaction_key(&self.user_id, &transaction.id),
            b"",
        );
        self.balance_dirty = true;
        self.entries += 1;
        Ok(())
    }

    /// Stage a CBOR-encoded record.
    pub fn put<T: Serialize>(&mut self, cf_name: &str, key: &[u8], value: &T) -> Result<()> {
        let cf = self.store.cf(cf_name)?;
        let value = serialize(value)?;
        self.batch.put_cf(&cf, key, value);
        Ok(())
    }

    /// Write everything staged in one batch.
    pub fn commit(mut self) -> Result<BalanceSnapshot> {
        if self.balance_dirty {
            let key = keys::user_prefix(&self.user_id);
            let balance = self.balance.clone();
            self.put(cf::BALANCES, &key, &balance)?;
        }
        let snapshot = self.balance.snapshot();
        self.store.write(self.batch)?;
        debug!(
            user_id = %self.user_id,
            ledger_entries = self.entries,
            total = snapshot.total,
            "unit of work committed"
        );
        Ok(snapshot)
    }
}
