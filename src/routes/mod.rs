mod error;
mod health_check;
mod subscriptions;
mod subscriptions_query;

pub use error::SubscriptionApiError;
pub use health_check::health_check;
pub use subscriptions::{
    handle_create_subscription, handle_delete_subscription, handle_get_subscription,
    handle_update_subscription,
};
pub use subscriptions_query::{
    handle_list_subscriptions, handle_summarize_costs, handle_summarize_costs_on_date,
};
