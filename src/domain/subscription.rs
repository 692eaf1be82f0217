use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::new_subscription::{NewSubscription, SubscriptionChanges};

/// A row of the `subscriptions` table.
///
/// `end_date` set to `None` means the subscription is open-ended.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize, sqlx::FromRow)]
pub struct Subscription {
    pub id: Uuid,
    pub service_name: String,
    pub price: i32,
    pub user_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl Subscription {
    /// Builds the record that will be inserted for a new subscription, assigning it a fresh id.
    pub fn from_new(new_subscription: NewSubscription) -> Subscription {
        Subscription {
            id: Uuid::new_v4(),
            service_name: new_subscription.service_name.as_ref().to_string(),
            price: new_subscription.price.value(),
            user_id: new_subscription.user_id,
            start_date: new_subscription.start_date.date(),
            end_date: new_subscription.end_date.map(|date| date.date()),
        }
    }

    pub fn with_changes(id: Uuid, changes: SubscriptionChanges) -> Subscription {
        Subscription {
            id,
            service_name: changes.service_name.as_ref().to_string(),
            price: changes.price.value(),
            user_id: changes.user_id,
            start_date: changes.start_date.date(),
            end_date: changes.end_date.map(|date| date.date()),
        }
    }

    /// Whether the billing interval of the subscription overlaps `[from, to]`.
    ///
    /// A missing bound leaves that side of the query interval unbounded.
    pub fn overlaps(&self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
        let starts_in_time = to.map_or(true, |to| self.start_date <= to);
        let still_running = match (self.end_date, from) {
            (Some(end_date), Some(from)) => end_date >= from,
            _ => true,
        };

        starts_in_time && still_running
    }

    /// In-memory form of the "active on a date" summary predicate the store compiles to SQL.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.overlaps(Some(date), Some(date))
    }
}
