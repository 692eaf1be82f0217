pub mod billing_date;
pub mod new_subscription;
pub mod service_name;
pub mod subscription;
pub mod subscription_price;

pub use billing_date::BillingDate;
pub use new_subscription::{
    NewSubscription, NewSubscriptionBody, SubscriptionChanges, SubscriptionChangesBody,
};
pub use service_name::ServiceName;
pub use subscription::Subscription;
pub use subscription_price::SubscriptionPrice;
