mod error;
pub mod filters;
pub mod observer;
mod subscriptions;
mod summary;

pub use error::StoreError;
pub use filters::{Constraint, Page, SubscriptionFilters};
pub use observer::{QueryEvent, QueryObserver, TracingObserver};
pub use summary::CostSummary;

use sqlx::PgPool;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Durable access to the `subscriptions` table.
///
/// Cloning is cheap: clones share the connection pool and the observer. Every statement
/// runs under `query_timeout`; a statement exceeding it is dropped and reported as
/// [`StoreError::Timeout`]. Failures are surfaced as they are, nothing is retried here.
#[derive(Clone)]
pub struct SubscriptionStore {
    db_pool: PgPool,
    query_timeout: Duration,
    observer: Arc<dyn QueryObserver>,
}

impl SubscriptionStore {
    pub fn new(db_pool: PgPool) -> SubscriptionStore {
        SubscriptionStore {
            db_pool,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            observer: Arc::new(TracingObserver),
        }
    }

    pub fn with_query_timeout(mut self, query_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn QueryObserver>) -> Self {
        self.observer = observer;
        self
    }

    async fn observe<T, F>(&self, operation: &'static str, sql: &str, query: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        let started_at = Instant::now();
        let result = match tokio::time::timeout(self.query_timeout, query).await {
            Ok(result) => result.map_err(StoreError::from),
            Err(_) => Err(StoreError::Timeout),
        };

        self.observer.on_query(&QueryEvent {
            operation,
            sql,
            elapsed: started_at.elapsed(),
            succeeded: result.is_ok(),
        });

        result
    }
}

/// Point mutations must touch exactly one row. Zero rows means the id does not exist,
/// more than one means identifiers collided.
fn expect_single_row(operation: &'static str, rows_affected: u64) -> Result<(), StoreError> {
    match rows_affected {
        1 => Ok(()),
        0 => Err(StoreError::NotFound),
        affected => {
            tracing::error!(
                operation,
                rows_affected = affected,
                "Subscription identifiers are not unique"
            );
            Err(StoreError::Consistency {
                expected: 1,
                affected,
            })
        }
    }
}
