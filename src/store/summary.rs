use sqlx::{Postgres, QueryBuilder};

use super::filters::push_where;
use super::{Page, StoreError, SubscriptionFilters, SubscriptionStore};
use crate::domain::Subscription;

const SELECT_SUBSCRIPTIONS: &str = r#"
    SELECT id, service_name, price, user_id, start_date, end_date
    FROM subscriptions"#;

// SUM over INTEGER is BIGINT in Postgres, enough for any realistic number of rows
const SELECT_COST_SUMMARY: &str = r#"
    SELECT COALESCE(SUM(price), 0)::BIGINT AS total_cost, COUNT(*) AS count
    FROM subscriptions"#;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CostSummary {
    pub total_cost: i64,
    pub count: i64,
}

impl SubscriptionStore {
    /// Subscriptions matching `filters`, ordered by start date then id, within `page`.
    #[tracing::instrument(name = "List subscriptions", skip(self))]
    pub async fn list(
        &self,
        filters: &SubscriptionFilters,
        page: Page,
    ) -> Result<Vec<Subscription>, StoreError> {
        let constraints = filters.constraints();
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(SELECT_SUBSCRIPTIONS);

        push_where(&mut builder, &constraints);
        builder.push(" ORDER BY start_date, id");
        page.push_sql(&mut builder);

        let sql = builder.sql().to_string();

        self.observe(
            "list",
            &sql,
            builder
                .build_query_as::<Subscription>()
                .fetch_all(&self.db_pool),
        )
        .await
    }

    /// Sums `price` and counts the subscriptions matching `filters`.
    ///
    /// No matching rows yields a zero summary, never an error.
    #[tracing::instrument(name = "Summarize subscription costs", skip(self))]
    pub async fn summarize(&self, filters: &SubscriptionFilters) -> Result<CostSummary, StoreError> {
        let constraints = filters.constraints();
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(SELECT_COST_SUMMARY);

        push_where(&mut builder, &constraints);

        let sql = builder.sql().to_string();
        let (total_cost, count) = self
            .observe(
                "summarize",
                &sql,
                builder
                    .build_query_as::<(i64, i64)>()
                    .fetch_one(&self.db_pool),
            )
            .await?;

        Ok(CostSummary { total_cost, count })
    }
}
