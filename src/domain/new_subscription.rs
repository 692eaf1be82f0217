use actix_web::web;
use chrono::Duration;
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::domain::billing_date::BillingDate;
use crate::domain::service_name::ServiceName;
use crate::domain::subscription_price::SubscriptionPrice;

const DEFAULT_BILLING_PERIOD_DAYS: i64 = 30;

#[derive(Debug)]
pub struct NewSubscription {
    pub service_name: ServiceName,
    pub price: SubscriptionPrice,
    pub user_id: Uuid,
    pub start_date: BillingDate,
    pub end_date: Option<BillingDate>,
}

/// Full replacement of the mutable fields of an existing subscription.
#[derive(Debug)]
pub struct SubscriptionChanges {
    pub service_name: ServiceName,
    pub price: SubscriptionPrice,
    pub user_id: Uuid,
    pub start_date: BillingDate,
    pub end_date: Option<BillingDate>,
}

#[derive(Deserialize, Debug)]
pub struct NewSubscriptionBody {
    pub service_name: String,
    pub price: i32,
    pub user_id: Uuid,
    pub start_date: String,
    // None when the field is missing, Some(None) when it is an explicit null
    #[serde(default, deserialize_with = "deserialize_present")]
    pub end_date: Option<Option<String>>,
}

#[derive(Deserialize, Debug)]
pub struct SubscriptionChangesBody {
    pub service_name: String,
    pub price: i32,
    pub user_id: Uuid,
    pub start_date: String,
    pub end_date: Option<String>,
}

impl TryFrom<web::Json<NewSubscriptionBody>> for NewSubscription {
    type Error = String;

    fn try_from(body: web::Json<NewSubscriptionBody>) -> Result<Self, Self::Error> {
        let body = body.into_inner();
        let service_name = ServiceName::parse(body.service_name)?;
        let price = SubscriptionPrice::parse(body.price)?;
        let start_date = BillingDate::parse(&body.start_date)?;
        let end_date = match body.end_date {
            Some(None) => None,
            Some(Some(end_date)) if !end_date.trim().is_empty() => {
                Some(BillingDate::parse(&end_date)?)
            }
            // Missing or blank
            _ => Some(default_end_date(start_date)?),
        };

        ensure_ordered(start_date, end_date)?;

        Ok(NewSubscription {
            service_name,
            price,
            user_id: body.user_id,
            start_date,
            end_date,
        })
    }
}

impl TryFrom<web::Json<SubscriptionChangesBody>> for SubscriptionChanges {
    type Error = String;

    fn try_from(body: web::Json<SubscriptionChangesBody>) -> Result<Self, Self::Error> {
        let body = body.into_inner();
        let service_name = ServiceName::parse(body.service_name)?;
        let price = SubscriptionPrice::parse(body.price)?;
        let start_date = BillingDate::parse(&body.start_date)?;
        let end_date = body
            .end_date
            .as_deref()
            .filter(|end_date| !end_date.trim().is_empty())
            .map(BillingDate::parse)
            .transpose()?;

        ensure_ordered(start_date, end_date)?;

        Ok(SubscriptionChanges {
            service_name,
            price,
            user_id: body.user_id,
            start_date,
            end_date,
        })
    }
}

fn default_end_date(start_date: BillingDate) -> Result<BillingDate, String> {
    start_date
        .date()
        .checked_add_signed(Duration::days(DEFAULT_BILLING_PERIOD_DAYS))
        .map(BillingDate::from)
        .ok_or_else(|| format!("{:?} is too far in the future", start_date.date()))
}

fn ensure_ordered(start_date: BillingDate, end_date: Option<BillingDate>) -> Result<(), String> {
    match end_date {
        Some(end_date) if end_date < start_date => Err(format!(
            "end_date {} is before start_date {}",
            end_date.date(),
            start_date.date()
        )),
        _ => Ok(()),
    }
}

fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}
