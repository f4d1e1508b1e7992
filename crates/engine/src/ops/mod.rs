use std::{future::Future, time::Duration};

use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait};

use crate::{EngineError, EntityKind, ResultEngine};

mod categories;
mod customers;
mod invoices;
mod items;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
///
/// The whole unit of work is bounded by the engine's operation timeout: when it
/// expires the transaction is dropped, which rolls it back.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        $self
            .bounded(async {
                let $tx = $self.database.begin().await?;
                let result: ResultEngine<_> = $body;
                match result {
                    Ok(value) => {
                        $tx.commit().await?;
                        Ok(value)
                    }
                    Err(err) => Err(err),
                }
            })
            .await
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    operation_timeout: Option<Duration>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Await `fut`, failing with [`EngineError::Timeout`] once the configured
    /// deadline is exceeded.
    async fn bounded<T, F>(&self, fut: F) -> ResultEngine<T>
    where
        F: Future<Output = ResultEngine<T>>,
    {
        let Some(limit) = self.operation_timeout else {
            return fut.await;
        };
        match tokio::time::timeout(limit, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(?limit, "engine operation timed out");
                Err(EngineError::Timeout(limit))
            }
        }
    }
}

/// How a missing row should be reported.
#[derive(Clone, Copy, Debug)]
enum Missing {
    /// The caller addressed the row directly (path id).
    NotFound,
    /// The row is referenced from a payload.
    Reference,
}

impl Missing {
    fn error(self, entity: EntityKind, id: i32) -> EngineError {
        match self {
            Self::NotFound => EngineError::NotFound { entity, id },
            Self::Reference => EngineError::MissingReference { entity, id },
        }
    }
}

/// Generates a `require_*` lookup returning the row or the matching error.
macro_rules! impl_require_row {
    ($fn_name:ident, $module:ident, $kind:expr) => {
        async fn $fn_name<C: ConnectionTrait>(
            db: &C,
            id: i32,
            missing: Missing,
        ) -> ResultEngine<crate::$module::Model> {
            crate::$module::Entity::find_by_id(id)
                .one(db)
                .await?
                .ok_or_else(|| missing.error($kind, id))
        }
    };
}

impl_require_row!(require_category, categories, EntityKind::Category);
impl_require_row!(require_item, items, EntityKind::Item);
impl_require_row!(require_customer, customers, EntityKind::Customer);

/// Fails with [`EngineError::HasDependents`] when `count > 0`.
fn ensure_no_dependents(
    entity: EntityKind,
    id: i32,
    dependents: EntityKind,
    count: u64,
) -> ResultEngine<()> {
    if count > 0 {
        return Err(EngineError::HasDependents {
            entity,
            id,
            dependents,
            count,
        });
    }
    Ok(())
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    operation_timeout: Option<Duration>,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Upper bound for a single engine operation. Unbounded when not set.
    pub fn operation_timeout(mut self, timeout: Duration) -> EngineBuilder {
        self.operation_timeout = Some(timeout);
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        if self.operation_timeout.is_some_and(|t| t.is_zero()) {
            return Err(EngineError::Validation(
                "operation timeout must be greater than zero".to_string(),
            ));
        }
        Ok(Engine {
            database: self.database,
            operation_timeout: self.operation_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use chrono::Utc;
    use migration::MigratorTrait;
    use sea_orm::{ActiveModelTrait, ActiveValue, Database, Statement, TransactionTrait};

    use super::*;
    use crate::{CategoryInput, CustomerInput, ItemInput, MoneyCents, invoice_items, invoices};

    async fn count_rows(db: &DatabaseConnection, table: &str) -> i64 {
        let row = db
            .query_one(Statement::from_string(
                db.get_database_backend(),
                format!("SELECT COUNT(*) AS n FROM {table}"),
            ))
            .await
            .unwrap()
            .unwrap();
        row.try_get::<i64>("", "n").unwrap()
    }

    #[tokio::test]
    async fn zero_timeout_is_rejected() {
        let err = Engine::builder()
            .operation_timeout(Duration::ZERO)
            .build()
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[tokio::test]
    async fn bounded_reports_timeout() {
        let limit = Duration::from_millis(10);
        let engine = Engine::builder()
            .operation_timeout(limit)
            .build()
            .await
            .unwrap();
        let err = engine
            .bounded(std::future::pending::<ResultEngine<()>>())
            .await
            .unwrap_err();
        assert_eq!(err, EngineError::Timeout(limit));
    }

    #[tokio::test]
    async fn unbounded_engine_awaits_the_future() {
        let engine = Engine::builder().build().await.unwrap();
        let value = engine.bounded(async { Ok::<_, EngineError>(7) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn timed_out_transaction_is_rolled_back() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();

        let setup = Engine::builder().database(db.clone()).build().await.unwrap();
        let food = setup
            .create_category(CategoryInput {
                name: "Food".to_string(),
                description: None,
            })
            .await
            .unwrap();
        let pizza = setup
            .create_item(ItemInput {
                name: "Pizza".to_string(),
                category_id: food.id,
                base_price: MoneyCents::new(1000),
                description: None,
            })
            .await
            .unwrap();
        let alice = setup
            .create_customer(CustomerInput {
                name: "Alice".to_string(),
                phone: None,
                email: None,
                address: None,
            })
            .await
            .unwrap();

        let limit = Duration::from_millis(100);
        let engine = Engine::builder()
            .database(db.clone())
            .operation_timeout(limit)
            .build()
            .await
            .unwrap();

        let written = AtomicBool::new(false);
        let result: ResultEngine<()> = with_tx!(engine, |db_tx| {
            let now = Utc::now();
            let header = invoices::ActiveModel {
                id: ActiveValue::NotSet,
                invoice_number: ActiveValue::Set("INV-stalled".to_string()),
                customer_id: ActiveValue::Set(alice.id),
                invoice_date: ActiveValue::Set(now),
                sub_total_minor: ActiveValue::Set(1000),
                tax_rate_ppm: ActiveValue::Set(0),
                tax_amount_minor: ActiveValue::Set(0),
                total_amount_minor: ActiveValue::Set(1000),
            }
            .insert(&db_tx)
            .await?;
            invoice_items::ActiveModel {
                id: ActiveValue::NotSet,
                invoice_id: ActiveValue::Set(header.id),
                item_id: ActiveValue::Set(pizza.id),
                quantity: ActiveValue::Set(1),
                unit_price_minor: ActiveValue::Set(1000),
                total_price_minor: ActiveValue::Set(1000),
            }
            .insert(&db_tx)
            .await?;
            written.store(true, Ordering::SeqCst);

            // Stall with the header and line written but not committed.
            std::future::pending::<ResultEngine<()>>().await
        });

        assert_eq!(result.unwrap_err(), EngineError::Timeout(limit));
        assert!(written.load(Ordering::SeqCst));
        assert_eq!(count_rows(&db, "invoices").await, 0);
        assert_eq!(count_rows(&db, "invoice_items").await, 0);
    }
}
