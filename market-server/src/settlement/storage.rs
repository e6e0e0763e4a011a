//! redb-based storage layer for the settlement engine
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `users` | `user_id` | `User` | User records |
//! | `usernames` | `username` | `user_id` | Username uniqueness index |
//! | `products` | `product_id` | `Product` | Product listings |
//! | `orders` | `order_id` | `Order` | Orders |
//! | `payments` | `payment_id` | `Payment` | Payment attempts |
//! | `order_payments` | `(order_id, payment_id)` | `()` | Order → payments index |
//! | `earnings` | `order_id` | `PlatformEarning` | One earning per completed order |
//! | `verifications` | `verification_id` | `Verification` | Seller verification requests |
//! | `user_verifications` | `(user_id, verification_id)` | `()` | User → verifications index |
//! | `counters` | name | `u64` | Durable number sequences |
//!
//! All values are JSON-serialized. Every settlement operation runs inside a
//! single `WriteTransaction`, so multi-entity updates (order + product +
//! earning, verification + user) commit or roll back together. redb admits
//! one writer at a time, which serializes concurrent operations against the
//! same store; the losing operation re-reads current state and fails its
//! status check instead of double-applying.
//!
//! # Durability
//!
//! redb commits with `Durability::Immediate` by default: once `commit()`
//! returns the state is on disk and the file is always consistent.

use redb::{
    Database, ReadTransaction, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction,
};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use shared::models::{Order, Payment, PaymentStatus, PlatformEarning, Product, User, Verification};

const USERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("users");
const USERNAMES_TABLE: TableDefinition<&str, &str> = TableDefinition::new("usernames");
const PRODUCTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("products");
const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");
const PAYMENTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("payments");
const ORDER_PAYMENTS_TABLE: TableDefinition<(&str, &str), ()> =
    TableDefinition::new("order_payments");
const EARNINGS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("earnings");
const VERIFICATIONS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("verifications");
const USER_VERIFICATIONS_TABLE: TableDefinition<(&str, &str), ()> =
    TableDefinition::new("user_verifications");
const COUNTERS_TABLE: TableDefinition<&str, u64> = TableDefinition::new("counters");

const ORDER_NUMBER_KEY: &str = "order_number";
const VERIFICATION_SEQ_KEY: &str = "verification_seq";
const VERIFICATION_DATE_KEY: &str = "verification_date";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<StorageError> for shared::error::AppError {
    fn from(err: StorageError) -> Self {
        shared::error::AppError::database(err.to_string())
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Marketplace storage backed by redb
#[derive(Clone)]
pub struct MarketStorage {
    db: Arc<Database>,
}

macro_rules! entity_accessors {
    ($get:ident, $get_txn:ident, $put:ident, $table:ident, $ty:ty) => {
        /// Load by id (read-only snapshot)
        pub fn $get(&self, id: &str) -> StorageResult<Option<$ty>> {
            let read_txn = self.db.begin_read()?;
            let table = read_txn.open_table($table)?;
            match table.get(id)? {
                Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
                None => Ok(None),
            }
        }

        /// Load by id inside a write transaction (sees uncommitted writes)
        pub fn $get_txn(&self, txn: &WriteTransaction, id: &str) -> StorageResult<Option<$ty>> {
            let table = txn.open_table($table)?;
            match table.get(id)? {
                Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
                None => Ok(None),
            }
        }

        /// Insert or overwrite inside a write transaction
        pub fn $put(&self, txn: &WriteTransaction, id: &str, value: &$ty) -> StorageResult<()> {
            let mut table = txn.open_table($table)?;
            let bytes = serde_json::to_vec(value)?;
            table.insert(id, bytes.as_slice())?;
            Ok(())
        }
    };
}

impl MarketStorage {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        let storage = Self { db: Arc::new(db) };
        storage.init_tables()?;
        Ok(storage)
    }

    /// Open an in-memory database (tests and ephemeral runs)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        let storage = Self { db: Arc::new(db) };
        storage.init_tables()?;
        Ok(storage)
    }

    fn init_tables(&self) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS_TABLE)?;
            let _ = write_txn.open_table(USERNAMES_TABLE)?;
            let _ = write_txn.open_table(PRODUCTS_TABLE)?;
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(PAYMENTS_TABLE)?;
            let _ = write_txn.open_table(ORDER_PAYMENTS_TABLE)?;
            let _ = write_txn.open_table(EARNINGS_TABLE)?;
            let _ = write_txn.open_table(VERIFICATIONS_TABLE)?;
            let _ = write_txn.open_table(USER_VERIFICATIONS_TABLE)?;

            let mut counters = write_txn.open_table(COUNTERS_TABLE)?;
            if counters.get(ORDER_NUMBER_KEY)?.is_none() {
                counters.insert(ORDER_NUMBER_KEY, 0u64)?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Begin a write transaction
    ///
    /// Blocks while another writer holds the lock; this is what serializes
    /// concurrent settlement operations.
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    /// Begin a read transaction
    pub fn begin_read(&self) -> StorageResult<ReadTransaction> {
        Ok(self.db.begin_read()?)
    }

    // ========== Entity accessors ==========

    entity_accessors!(get_user, get_user_txn, put_user, USERS_TABLE, User);
    entity_accessors!(
        get_product,
        get_product_txn,
        put_product,
        PRODUCTS_TABLE,
        Product
    );
    entity_accessors!(get_order, get_order_txn, put_order, ORDERS_TABLE, Order);
    entity_accessors!(
        get_payment,
        get_payment_txn,
        put_payment,
        PAYMENTS_TABLE,
        Payment
    );
    entity_accessors!(
        get_verification,
        get_verification_txn,
        put_verification,
        VERIFICATIONS_TABLE,
        Verification
    );

    // ========== Username index ==========

    /// Look up a user id by username
    pub fn get_user_id_by_username(&self, username: &str) -> StorageResult<Option<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERNAMES_TABLE)?;
        Ok(table.get(username)?.map(|g| g.value().to_string()))
    }

    /// Whether a username is taken (within a write transaction)
    pub fn username_exists_txn(&self, txn: &WriteTransaction, username: &str) -> StorageResult<bool> {
        let table = txn.open_table(USERNAMES_TABLE)?;
        Ok(table.get(username)?.is_some())
    }

    /// Reserve a username for a user id
    pub fn put_username(
        &self,
        txn: &WriteTransaction,
        username: &str,
        user_id: &str,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(USERNAMES_TABLE)?;
        table.insert(username, user_id)?;
        Ok(())
    }

    // ========== Order ↔ payment index ==========

    /// Link a payment to its order
    pub fn link_payment(
        &self,
        txn: &WriteTransaction,
        order_id: &str,
        payment_id: &str,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(ORDER_PAYMENTS_TABLE)?;
        table.insert((order_id, payment_id), ())?;
        Ok(())
    }

    /// All payment attempts for an order, inside a write transaction
    pub fn payments_for_order_txn(
        &self,
        txn: &WriteTransaction,
        order_id: &str,
    ) -> StorageResult<Vec<Payment>> {
        let index = txn.open_table(ORDER_PAYMENTS_TABLE)?;
        let payments_table = txn.open_table(PAYMENTS_TABLE)?;
        let mut payments = Vec::new();
        for entry in index.range((order_id, "")..=(order_id, "\u{10ffff}"))? {
            let (key, _) = entry?;
            let (_, payment_id) = key.value();
            if let Some(guard) = payments_table.get(payment_id)? {
                payments.push(serde_json::from_slice(guard.value())?);
            }
        }
        Ok(payments)
    }

    /// All payment attempts for an order (read-only snapshot)
    pub fn payments_for_order(&self, order_id: &str) -> StorageResult<Vec<Payment>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(ORDER_PAYMENTS_TABLE)?;
        let payments_table = read_txn.open_table(PAYMENTS_TABLE)?;
        let mut payments = Vec::new();
        for entry in index.range((order_id, "")..=(order_id, "\u{10ffff}"))? {
            let (key, _) = entry?;
            let (_, payment_id) = key.value();
            if let Some(guard) = payments_table.get(payment_id)? {
                payments.push(serde_json::from_slice(guard.value())?);
            }
        }
        Ok(payments)
    }

    // ========== Earnings ==========

    /// Earning for a completed order, keyed by order id (one per order)
    pub fn get_earning(&self, order_id: &str) -> StorageResult<Option<PlatformEarning>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(EARNINGS_TABLE)?;
        match table.get(order_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// Record an earning for an order
    pub fn put_earning(
        &self,
        txn: &WriteTransaction,
        order_id: &str,
        earning: &PlatformEarning,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(EARNINGS_TABLE)?;
        let bytes = serde_json::to_vec(earning)?;
        table.insert(order_id, bytes.as_slice())?;
        Ok(())
    }

    /// All recorded earnings
    pub fn list_earnings(&self) -> StorageResult<Vec<PlatformEarning>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(EARNINGS_TABLE)?;
        let mut earnings = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            earnings.push(serde_json::from_slice(value.value())?);
        }
        Ok(earnings)
    }

    // ========== Verification index ==========

    /// Link a verification to its applicant
    pub fn link_verification(
        &self,
        txn: &WriteTransaction,
        user_id: &str,
        verification_id: &str,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(USER_VERIFICATIONS_TABLE)?;
        table.insert((user_id, verification_id), ())?;
        Ok(())
    }

    /// All verification requests for a user, inside a write transaction
    pub fn verifications_for_user_txn(
        &self,
        txn: &WriteTransaction,
        user_id: &str,
    ) -> StorageResult<Vec<Verification>> {
        let index = txn.open_table(USER_VERIFICATIONS_TABLE)?;
        let verifications_table = txn.open_table(VERIFICATIONS_TABLE)?;
        let mut verifications = Vec::new();
        for entry in index.range((user_id, "")..=(user_id, "\u{10ffff}"))? {
            let (key, _) = entry?;
            let (_, verification_id) = key.value();
            if let Some(guard) = verifications_table.get(verification_id)? {
                verifications.push(serde_json::from_slice(guard.value())?);
            }
        }
        Ok(verifications)
    }

    /// All verification requests for a user (read-only snapshot)
    pub fn verifications_for_user(&self, user_id: &str) -> StorageResult<Vec<Verification>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(USER_VERIFICATIONS_TABLE)?;
        let verifications_table = read_txn.open_table(VERIFICATIONS_TABLE)?;
        let mut verifications = Vec::new();
        for entry in index.range((user_id, "")..=(user_id, "\u{10ffff}"))? {
            let (key, _) = entry?;
            let (_, verification_id) = key.value();
            if let Some(guard) = verifications_table.get(verification_id)? {
                verifications.push(serde_json::from_slice(guard.value())?);
            }
        }
        Ok(verifications)
    }

    /// Pending verification requests across all users (admin review queue)
    pub fn list_pending_verifications(&self) -> StorageResult<Vec<Verification>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(VERIFICATIONS_TABLE)?;
        let mut pending = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let verification: Verification = serde_json::from_slice(value.value())?;
            if !verification.status.is_reviewed() {
                pending.push(verification);
            }
        }
        pending.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at));
        Ok(pending)
    }

    // ========== Listing scans ==========

    /// All products, optionally only purchasable ones
    pub fn list_products(&self, available_only: bool) -> StorageResult<Vec<Product>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PRODUCTS_TABLE)?;
        let mut products = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let product: Product = serde_json::from_slice(value.value())?;
            if !available_only || product.status.is_purchasable() {
                products.push(product);
            }
        }
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(products)
    }

    /// Listings owned by a seller
    pub fn list_products_for_seller(&self, seller_id: &str) -> StorageResult<Vec<Product>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PRODUCTS_TABLE)?;
        let mut products = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let product: Product = serde_json::from_slice(value.value())?;
            if product.seller_id == seller_id {
                products.push(product);
            }
        }
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(products)
    }

    /// Orders where the user is the buyer
    pub fn list_orders_for_buyer(&self, buyer_id: &str) -> StorageResult<Vec<Order>> {
        self.scan_orders(|o| o.buyer_id == buyer_id)
    }

    /// Orders where the user is the seller
    pub fn list_orders_for_seller(&self, seller_id: &str) -> StorageResult<Vec<Order>> {
        self.scan_orders(|o| o.seller_id == seller_id)
    }

    fn scan_orders(&self, keep: impl Fn(&Order) -> bool) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        let mut orders = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let order: Order = serde_json::from_slice(value.value())?;
            if keep(&order) {
                orders.push(order);
            }
        }
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    /// Payments left in `Processing` (crash recovery scan at startup)
    pub fn list_processing_payments(&self) -> StorageResult<Vec<Payment>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PAYMENTS_TABLE)?;
        let mut processing = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let payment: Payment = serde_json::from_slice(value.value())?;
            if payment.status == PaymentStatus::Processing {
                processing.push(payment);
            }
        }
        Ok(processing)
    }

    // ========== Counters ==========

    /// Next order number, incremented within the transaction
    pub fn next_order_number(&self, txn: &WriteTransaction) -> StorageResult<u64> {
        let mut table = txn.open_table(COUNTERS_TABLE)?;
        let current = table.get(ORDER_NUMBER_KEY)?.map(|g| g.value()).unwrap_or(0);
        let next = current + 1;
        table.insert(ORDER_NUMBER_KEY, next)?;
        Ok(next)
    }

    /// Next verification sequence for the given day (YYYYMMDD)
    ///
    /// The per-day counter resets when the stored date changes, so codes
    /// restart at 0001 each day.
    pub fn next_verification_seq(&self, txn: &WriteTransaction, date: u64) -> StorageResult<u64> {
        let mut table = txn.open_table(COUNTERS_TABLE)?;
        let stored_date = table
            .get(VERIFICATION_DATE_KEY)?
            .map(|g| g.value())
            .unwrap_or(0);
        let current = if stored_date == date {
            table
                .get(VERIFICATION_SEQ_KEY)?
                .map(|g| g.value())
                .unwrap_or(0)
        } else {
            0
        };
        let next = current + 1;
        table.insert(VERIFICATION_DATE_KEY, date)?;
        table.insert(VERIFICATION_SEQ_KEY, next)?;
        Ok(next)
    }
}
