use std::time::Duration;

/// A statement issued by the subscription store, reported once it has finished.
#[derive(Debug)]
pub struct QueryEvent<'a> {
    pub operation: &'static str,
    pub sql: &'a str,
    pub elapsed: Duration,
    pub succeeded: bool,
}

/// Hook receiving every statement the store issues.
pub trait QueryObserver: Send + Sync {
    fn on_query(&self, event: &QueryEvent<'_>);
}

/// Reports statements as `tracing` debug events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl QueryObserver for TracingObserver {
    fn on_query(&self, event: &QueryEvent<'_>) {
        tracing::debug!(
            operation = event.operation,
            sql = event.sql,
            elapsed_ms = event.elapsed.as_millis() as u64,
            succeeded = event.succeeded,
            "Subscription store query finished"
        );
    }
}
