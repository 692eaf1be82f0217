use uuid::Uuid;

use super::{expect_single_row, StoreError, SubscriptionStore};
use crate::domain::Subscription;

const INSERT_SUBSCRIPTION: &str = r#"
    INSERT INTO subscriptions (id, service_name, price, user_id, start_date, end_date)
    VALUES ($1, $2, $3, $4, $5, $6)
"#;

const SELECT_SUBSCRIPTION: &str = r#"
    SELECT id, service_name, price, user_id, start_date, end_date
    FROM subscriptions
    WHERE id = $1
"#;

const UPDATE_SUBSCRIPTION: &str = r#"
    UPDATE subscriptions
    SET service_name = $2, price = $3, user_id = $4, start_date = $5, end_date = $6
    WHERE id = $1
"#;

const DELETE_SUBSCRIPTION: &str = r#"
    DELETE FROM subscriptions
    WHERE id = $1
"#;

impl SubscriptionStore {
    #[tracing::instrument(
        name = "Insert a new subscription into the database",
        skip(self, subscription),
        fields(
            subscription_id = %subscription.id,
            user_id = %subscription.user_id
        )
    )]
    pub async fn create(&self, subscription: &Subscription) -> Result<(), StoreError> {
        self.observe(
            "create",
            INSERT_SUBSCRIPTION,
            sqlx::query(INSERT_SUBSCRIPTION)
                .bind(subscription.id)
                .bind(&subscription.service_name)
                .bind(subscription.price)
                .bind(subscription.user_id)
                .bind(subscription.start_date)
                .bind(subscription.end_date)
                .execute(&self.db_pool),
        )
        .await?;

        Ok(())
    }

    #[tracing::instrument(name = "Fetch a subscription by id", skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<Subscription, StoreError> {
        self.observe(
            "get",
            SELECT_SUBSCRIPTION,
            sqlx::query_as::<_, Subscription>(SELECT_SUBSCRIPTION)
                .bind(id)
                .fetch_optional(&self.db_pool),
        )
        .await?
        .ok_or(StoreError::NotFound)
    }

    /// Overwrites every mutable field of the subscription identified by `subscription.id`.
    #[tracing::instrument(
        name = "Update a subscription",
        skip(self, subscription),
        fields(subscription_id = %subscription.id)
    )]
    pub async fn update(&self, subscription: &Subscription) -> Result<(), StoreError> {
        let result = self
            .observe(
                "update",
                UPDATE_SUBSCRIPTION,
                sqlx::query(UPDATE_SUBSCRIPTION)
                    .bind(subscription.id)
                    .bind(&subscription.service_name)
                    .bind(subscription.price)
                    .bind(subscription.user_id)
                    .bind(subscription.start_date)
                    .bind(subscription.end_date)
                    .execute(&self.db_pool),
            )
            .await?;

        expect_single_row("update", result.rows_affected())
    }

    #[tracing::instrument(name = "Delete a subscription", skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = self
            .observe(
                "delete",
                DELETE_SUBSCRIPTION,
                sqlx::query(DELETE_SUBSCRIPTION)
                    .bind(id)
                    .execute(&self.db_pool),
            )
            .await?;

        expect_single_row("delete", result.rows_affected())
    }
}
