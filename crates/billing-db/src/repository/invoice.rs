//! # Invoice Repository
//!
//! The invoice creation transaction and the invoice read models. This is
//! the only write path for `invoices` and `invoice_items` rows in the
//! whole system.
//!
//! ## Creation Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Invoice Creation Protocol                           │
//! │                                                                         │
//! │  validate_new_invoice(request)      ── pure checks, no store access     │
//! │       │                                                                 │
//! │  resolve customer, resolve products ── reads, outside the transaction   │
//! │       │  (any failure so far: reject, zero writes)                      │
//! │       ▼                                                                 │
//! │  lock creation mutex  ◄──────────── one writer at a time, in-process    │
//! │       │                                                                 │
//! │  ┌────▼────────────────────────────────────────────────────┐            │
//! │  │ BEGIN                                                   │            │
//! │  │   read highest number in (month, year) scope            │ same       │
//! │  │   serial := parse(highest) + 1   (1 if scope empty)     │ connection │
//! │  │   INSERT invoice  (number, date, total, customer snap)  │            │
//! │  │   INSERT each item (submission order)                   │            │
//! │  │ COMMIT                                                  │            │
//! │  └────┬────────────────────────────────────────────────────┘            │
//! │       │ UNIQUE(invoice_number) violated?                                │
//! │       │   => another writer (outside our mutex, e.g. a second           │
//! │       │      process) won the serial. Retry the block ONCE.             │
//! │       ▼                                                                 │
//! │  unlock, return created invoice + items                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why Both The Mutex And The Retry?
//! The mutex serializes all creations going through this process, which
//! is the common deployment. The UNIQUE constraint plus a single retry
//! covers writers the mutex cannot see, such as a second process opening
//! the same database file. Failures inside the block roll the whole
//! transaction back; a partially-written invoice is never observable.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbResult, InvoiceError, InvoiceResult};
use crate::repository::customer::CustomerRepository;
use crate::repository::product::ProductRepository;
use billing_core::validation::validate_new_invoice;
use billing_core::{CoreError, Customer, Invoice, InvoiceItem, NewInvoice, NumberScope};

// =============================================================================
// Read Models
// =============================================================================

/// The result of a successful creation: the invoice and its items in
/// submission order.
#[derive(Debug, Clone)]
pub struct CreatedInvoice {
    pub invoice: Invoice,
    pub items: Vec<InvoiceItem>,
}

/// A line item joined with its product name, for listing and receipts.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InvoiceItemDetail {
    pub id: String,
    pub invoice_id: String,
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub rate_cents: i64,
    pub total_cents: i64,
}

/// An invoice with its joined line items.
#[derive(Debug, Clone)]
pub struct InvoiceWithItems {
    pub invoice: Invoice,
    pub items: Vec<InvoiceItemDetail>,
}

const INVOICE_COLUMNS: &str = "id, invoice_number, date, total_cents, customer_id, \
     customer_name, customer_mobile, customer_address, created_at";

const ITEM_DETAIL_QUERY: &str = "\
    SELECT ii.id, ii.invoice_id, ii.product_id, p.name AS product_name, \
           ii.quantity, ii.rate_cents, ii.total_cents \
    FROM invoice_items ii \
    JOIN products p ON p.id = ii.product_id";

// =============================================================================
// Repository
// =============================================================================

/// Repository for invoice operations.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: SqlitePool,
    /// Shared with every clone of the owning `Database` handle.
    creation_lock: Arc<Mutex<()>>,
}

impl InvoiceRepository {
    /// Creates a new InvoiceRepository.
    pub fn new(pool: SqlitePool, creation_lock: Arc<Mutex<()>>) -> Self {
        InvoiceRepository {
            pool,
            creation_lock,
        }
    }

    // -------------------------------------------------------------------------
    // Creation
    // -------------------------------------------------------------------------

    /// Creates an invoice dated now.
    ///
    /// See [`InvoiceRepository::create_at`] for the full contract.
    pub async fn create(&self, new: NewInvoice) -> InvoiceResult<CreatedInvoice> {
        self.create_at(new, Utc::now()).await
    }

    /// Creates an invoice with an explicit date.
    ///
    /// The date determines both the stored invoice date and the
    /// `(month, year)` scope the serial is allocated in.
    ///
    /// ## Errors
    /// - `InvoiceError::Domain` - empty items, total mismatches, unknown
    ///   customer or product ids. Nothing was written.
    /// - `InvoiceError::Allocation` - the scope maximum could not be read
    ///   or parsed. The transaction was rolled back.
    /// - `InvoiceError::Storage` - the transaction failed to commit after
    ///   one transparent retry of the allocation-collision case.
    pub async fn create_at(
        &self,
        new: NewInvoice,
        date: DateTime<Utc>,
    ) -> InvoiceResult<CreatedInvoice> {
        // Pure structural checks first: fail fast, no store access.
        validate_new_invoice(&new)?;

        // Resolve references before opening the transaction.
        let customer = CustomerRepository::new(self.pool.clone())
            .get_by_id(&new.customer_id)
            .await?
            .ok_or_else(|| CoreError::CustomerNotFound(new.customer_id.clone()))?;

        let requested: BTreeSet<String> = new
            .items
            .iter()
            .map(|item| item.product_id.clone())
            .collect();
        let requested: Vec<String> = requested.into_iter().collect();

        let found = ProductRepository::new(self.pool.clone())
            .get_by_ids(&requested)
            .await?;
        let found_ids: HashSet<&str> = found.iter().map(|p| p.id.as_str()).collect();

        let missing: Vec<String> = requested
            .iter()
            .filter(|id| !found_ids.contains(id.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(CoreError::ProductsNotFound { ids: missing }.into());
        }

        debug!(
            customer_id = %customer.id,
            items = new.items.len(),
            total = new.total_cents,
            "Creating invoice"
        );

        // Single writer from here on. Held across allocation + insert +
        // commit so two in-process creations can never read the same
        // scope maximum.
        let _guard = self.creation_lock.lock().await;

        match self.insert_in_transaction(&new, &customer, date).await {
            Err(InvoiceError::Storage(err)) if err.is_unique_violation_on("invoice_number") => {
                // Another writer outside the mutex took our serial between
                // our read and our commit. Expected under multi-process
                // load; re-run allocation + insert once.
                warn!("Invoice number collision at commit, retrying allocation once");
                self.insert_in_transaction(&new, &customer, date).await
            }
            other => other,
        }
    }

    /// Allocates a number and inserts the invoice plus its items as one
    /// transaction. Dropping the transaction on any error path rolls all
    /// of it back.
    async fn insert_in_transaction(
        &self,
        new: &NewInvoice,
        customer: &Customer,
        date: DateTime<Utc>,
    ) -> InvoiceResult<CreatedInvoice> {
        let mut tx = self.pool.begin().await?;

        // The scope read happens on the transaction's own connection so
        // the read-max and the insert share one isolation scope.
        let scope = NumberScope::for_date(date);
        let highest: Option<String> = sqlx::query_scalar(
            r#"
            SELECT invoice_number
            FROM invoices
            WHERE invoice_number LIKE ?1
            ORDER BY LENGTH(invoice_number) DESC, invoice_number DESC
            LIMIT 1
            "#,
        )
        .bind(scope.like_pattern())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| InvoiceError::Allocation(e.to_string()))?;

        let invoice_number = scope
            .next_number(highest.as_deref())
            .map_err(|e| InvoiceError::Allocation(e.to_string()))?;

        let invoice = Invoice {
            id: Uuid::new_v4().to_string(),
            invoice_number,
            date,
            total_cents: new.total_cents,
            customer_id: customer.id.clone(),
            customer_name: customer.name.clone(),
            customer_mobile: customer.mobile.clone(),
            customer_address: customer.address.clone(),
            created_at: date,
        };

        sqlx::query(
            r#"
            INSERT INTO invoices (
                id, invoice_number, date, total_cents,
                customer_id, customer_name, customer_mobile, customer_address,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&invoice.id)
        .bind(&invoice.invoice_number)
        .bind(invoice.date)
        .bind(invoice.total_cents)
        .bind(&invoice.customer_id)
        .bind(&invoice.customer_name)
        .bind(&invoice.customer_mobile)
        .bind(&invoice.customer_address)
        .bind(invoice.created_at)
        .execute(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(new.items.len());
        for requested in &new.items {
            let item = InvoiceItem {
                id: Uuid::new_v4().to_string(),
                invoice_id: invoice.id.clone(),
                product_id: requested.product_id.clone(),
                quantity: requested.quantity,
                rate_cents: requested.rate_cents,
                total_cents: requested.total_cents,
                created_at: date,
            };

            sqlx::query(
                r#"
                INSERT INTO invoice_items (
                    id, invoice_id, product_id, quantity, rate_cents, total_cents, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(&item.id)
            .bind(&item.invoice_id)
            .bind(&item.product_id)
            .bind(item.quantity)
            .bind(item.rate_cents)
            .bind(item.total_cents)
            .bind(item.created_at)
            .execute(&mut *tx)
            .await?;

            items.push(item);
        }

        tx.commit().await?;

        info!(
            invoice_id = %invoice.id,
            invoice_number = %invoice.invoice_number,
            total = invoice.total_cents,
            items = items.len(),
            "Invoice created"
        );

        Ok(CreatedInvoice { invoice, items })
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Gets an invoice by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Invoice>> {
        let invoice: Option<Invoice> = sqlx::query_as(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invoice)
    }

    /// Gets an invoice with its line items (submission order), joined
    /// with product names.
    pub async fn get_with_items(&self, id: &str) -> DbResult<Option<InvoiceWithItems>> {
        let Some(invoice) = self.get_by_id(id).await? else {
            return Ok(None);
        };

        let items: Vec<InvoiceItemDetail> = sqlx::query_as(&format!(
            "{ITEM_DETAIL_QUERY} WHERE ii.invoice_id = ?1 ORDER BY ii.rowid"
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(InvoiceWithItems { invoice, items }))
    }

    /// Lists all invoices, newest first, each with its line items.
    pub async fn list_with_items(&self) -> DbResult<Vec<InvoiceWithItems>> {
        let invoices: Vec<Invoice> = sqlx::query_as(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices ORDER BY date DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        let details: Vec<InvoiceItemDetail> =
            sqlx::query_as(&format!("{ITEM_DETAIL_QUERY} ORDER BY ii.rowid"))
                .fetch_all(&self.pool)
                .await?;

        let mut by_invoice: HashMap<String, Vec<InvoiceItemDetail>> = HashMap::new();
        for detail in details {
            by_invoice
                .entry(detail.invoice_id.clone())
                .or_default()
                .push(detail);
        }

        Ok(invoices
            .into_iter()
            .map(|invoice| {
                let items = by_invoice.remove(&invoice.id).unwrap_or_default();
                InvoiceWithItems { invoice, items }
            })
            .collect())
    }

    /// Counts all invoices.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoices")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use billing_core::invoice_number::parse_serial;
    use billing_core::{NewInvoiceItem, Product};
    use chrono::TimeZone;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_customer(db: &Database) -> Customer {
        db.customers()
            .insert("Ali Traders", "9876543210", "12 Workshop Road")
            .await
            .unwrap()
    }

    async fn seed_product(db: &Database, name: &str, rate_cents: i64) -> Product {
        db.products().insert(name, rate_cents).await.unwrap()
    }

    /// Builds a structurally valid request from (product_id, quantity, rate).
    fn request(customer_id: &str, lines: &[(&str, i64, i64)]) -> NewInvoice {
        let items: Vec<NewInvoiceItem> = lines
            .iter()
            .map(|(product_id, quantity, rate_cents)| NewInvoiceItem {
                product_id: product_id.to_string(),
                quantity: *quantity,
                rate_cents: *rate_cents,
                total_cents: quantity * rate_cents,
            })
            .collect();
        let total_cents = items.iter().map(|i| i.total_cents).sum();
        NewInvoice {
            customer_id: customer_id.to_string(),
            items,
            total_cents,
        }
    }

    fn march(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_first_invoice_in_empty_scope() {
        let db = test_db().await;
        let customer = seed_customer(&db).await;
        let product = seed_product(&db, "Engine Oil 1L", 5000).await;

        let created = db
            .invoices()
            .create_at(request(&customer.id, &[(&product.id, 2, 5000)]), march(15))
            .await
            .unwrap();

        assert_eq!(created.invoice.invoice_number, "001/03/24");
        assert_eq!(created.invoice.total_cents, 10000);
        assert_eq!(created.items.len(), 1);
        assert_eq!(created.items[0].quantity, 2);
        assert_eq!(created.items[0].total_cents, 10000);

        let second = db
            .invoices()
            .create_at(request(&customer.id, &[(&product.id, 1, 5000)]), march(15))
            .await
            .unwrap();
        assert_eq!(second.invoice.invoice_number, "002/03/24");
    }

    #[tokio::test]
    async fn test_serials_monotonic_within_scope() {
        let db = test_db().await;
        let customer = seed_customer(&db).await;
        let product = seed_product(&db, "Engine Oil 1L", 5000).await;

        for _ in 0..5 {
            db.invoices()
                .create_at(request(&customer.id, &[(&product.id, 1, 5000)]), march(20))
                .await
                .unwrap();
        }

        let mut serials: Vec<u64> = db
            .invoices()
            .list_with_items()
            .await
            .unwrap()
            .iter()
            .map(|i| parse_serial(&i.invoice.invoice_number).unwrap())
            .collect();
        serials.sort_unstable();
        assert_eq!(serials, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_scope_resets_each_month() {
        let db = test_db().await;
        let customer = seed_customer(&db).await;
        let product = seed_product(&db, "Engine Oil 1L", 5000).await;

        let invoices = db.invoices();
        invoices
            .create_at(request(&customer.id, &[(&product.id, 1, 5000)]), march(30))
            .await
            .unwrap();
        invoices
            .create_at(request(&customer.id, &[(&product.id, 1, 5000)]), march(31))
            .await
            .unwrap();

        let april = Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap();
        let created = invoices
            .create_at(request(&customer.id, &[(&product.id, 1, 5000)]), april)
            .await
            .unwrap();

        assert_eq!(created.invoice.invoice_number, "001/04/24");
    }

    #[tokio::test]
    async fn test_unknown_customer_rejected_with_zero_writes() {
        let db = test_db().await;
        let product = seed_product(&db, "Engine Oil 1L", 5000).await;

        let err = db
            .invoices()
            .create_at(request("no-such-customer", &[(&product.id, 1, 5000)]), march(15))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            InvoiceError::Domain(CoreError::CustomerNotFound(_))
        ));
        assert_eq!(db.invoices().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_one_unknown_product_rejects_whole_invoice() {
        let db = test_db().await;
        let customer = seed_customer(&db).await;
        let product = seed_product(&db, "Engine Oil 1L", 5000).await;

        let before = db.invoices().list_with_items().await.unwrap().len();

        let err = db
            .invoices()
            .create_at(
                request(
                    &customer.id,
                    &[(&product.id, 1, 5000), ("missing-product", 2, 100)],
                ),
                march(15),
            )
            .await
            .unwrap_err();

        match err {
            InvoiceError::Domain(CoreError::ProductsNotFound { ids }) => {
                assert_eq!(ids, vec!["missing-product".to_string()]);
            }
            other => panic!("expected ProductsNotFound, got {other:?}"),
        }

        // Reads are identical before and after the failed attempt.
        let after = db.invoices().list_with_items().await.unwrap().len();
        assert_eq!(before, after);
        assert_eq!(db.invoices().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_empty_items_rejected() {
        let db = test_db().await;
        let customer = seed_customer(&db).await;

        let err = db
            .invoices()
            .create_at(request(&customer.id, &[]), march(15))
            .await
            .unwrap_err();

        assert!(matches!(err, InvoiceError::Domain(CoreError::EmptyInvoice)));
    }

    #[tokio::test]
    async fn test_total_mismatch_rejected() {
        let db = test_db().await;
        let customer = seed_customer(&db).await;
        let product = seed_product(&db, "Engine Oil 1L", 5000).await;

        let mut new = request(&customer.id, &[(&product.id, 2, 5000)]);
        new.total_cents = 9999;

        let err = db.invoices().create_at(new, march(15)).await.unwrap_err();
        assert!(matches!(
            err,
            InvoiceError::Domain(CoreError::TotalMismatch { .. })
        ));
        assert_eq!(db.invoices().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_mid_transaction_failure_rolls_everything_back() {
        let db = test_db().await;
        let customer = seed_customer(&db).await;
        let product = seed_product(&db, "Engine Oil 1L", 5000).await;

        // Bypass reference validation to force a foreign-key failure on
        // the SECOND item insert, after the invoice row and first item
        // were already written inside the transaction.
        let new = request(
            &customer.id,
            &[(&product.id, 1, 5000), ("ghost-product", 1, 100)],
        );
        let repo = db.invoices();
        let err = repo
            .insert_in_transaction(&new, &customer, march(15))
            .await
            .unwrap_err();
        assert!(matches!(err, InvoiceError::Storage(_)));

        // Nothing from the attempt is observable.
        assert_eq!(repo.count().await.unwrap(), 0);
        let orphan_items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoice_items")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(orphan_items, 0);

        // And the allocator still hands out serial 1 afterwards.
        let created = repo
            .create_at(request(&customer.id, &[(&product.id, 1, 5000)]), march(15))
            .await
            .unwrap();
        assert_eq!(created.invoice.invoice_number, "001/03/24");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creations_get_distinct_contiguous_serials() {
        let db = test_db().await;
        let customer = seed_customer(&db).await;
        let product = seed_product(&db, "Engine Oil 1L", 5000).await;

        const N: usize = 20;
        let mut handles = Vec::with_capacity(N);
        for _ in 0..N {
            let db = db.clone();
            let customer_id = customer.id.clone();
            let product_id = product.id.clone();
            handles.push(tokio::spawn(async move {
                db.invoices()
                    .create(request(&customer_id, &[(&product_id, 1, 5000)]))
                    .await
            }));
        }

        let mut serials = Vec::with_capacity(N);
        for handle in handles {
            let created = handle.await.unwrap().unwrap();
            serials.push(parse_serial(&created.invoice.invoice_number).unwrap());
        }

        serials.sort_unstable();
        let expected: Vec<u64> = (1..=N as u64).collect();
        assert_eq!(serials, expected, "serials must be distinct and gap-free");
    }

    #[tokio::test]
    async fn test_customer_snapshot_survives_customer_edit() {
        let db = test_db().await;
        let customer = seed_customer(&db).await;
        let product = seed_product(&db, "Engine Oil 1L", 5000).await;

        let created = db
            .invoices()
            .create_at(request(&customer.id, &[(&product.id, 1, 5000)]), march(15))
            .await
            .unwrap();

        db.customers()
            .update(&customer.id, Some("Renamed Traders"), None, Some("New Address"))
            .await
            .unwrap();

        let fetched = db
            .invoices()
            .get_with_items(&created.invoice.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.invoice.customer_name, "Ali Traders");
        assert_eq!(fetched.invoice.customer_address, "12 Workshop Road");
    }

    #[tokio::test]
    async fn test_get_with_items_preserves_submission_order() {
        let db = test_db().await;
        let customer = seed_customer(&db).await;
        let oil = seed_product(&db, "Engine Oil 1L", 5000).await;
        let filter = seed_product(&db, "Air Filter", 1500).await;
        let fluid = seed_product(&db, "Brake Fluid", 2000).await;

        let created = db
            .invoices()
            .create_at(
                request(
                    &customer.id,
                    &[(&fluid.id, 1, 2000), (&oil.id, 2, 5000), (&filter.id, 3, 1500)],
                ),
                march(15),
            )
            .await
            .unwrap();

        let fetched = db
            .invoices()
            .get_with_items(&created.invoice.id)
            .await
            .unwrap()
            .unwrap();

        let names: Vec<&str> = fetched.items.iter().map(|i| i.product_name.as_str()).collect();
        assert_eq!(names, vec!["Brake Fluid", "Engine Oil 1L", "Air Filter"]);
        assert_eq!(fetched.invoice.total_cents, 16500);
    }

    #[tokio::test]
    async fn test_referenced_product_cannot_be_deleted() {
        let db = test_db().await;
        let customer = seed_customer(&db).await;
        let product = seed_product(&db, "Engine Oil 1L", 5000).await;

        db.invoices()
            .create_at(request(&customer.id, &[(&product.id, 1, 5000)]), march(15))
            .await
            .unwrap();

        let product_err = db.products().delete(&product.id).await.unwrap_err();
        assert!(matches!(product_err, crate::error::DbError::InUse { .. }));

        let customer_err = db.customers().delete(&customer.id).await.unwrap_err();
        assert!(matches!(customer_err, crate::error::DbError::InUse { .. }));
    }
}
