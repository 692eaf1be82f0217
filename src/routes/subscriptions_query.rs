use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::BillingDate;
use crate::routes::error::SubscriptionApiError;
use crate::store::{Page, SubscriptionFilters, SubscriptionStore};

#[derive(Deserialize, Debug, Default)]
pub struct FilterParameters {
    pub user_id: Option<Uuid>,
    pub service_name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct PageParameters {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Deserialize, Debug)]
pub struct OwnerParameters {
    pub user_id: Option<Uuid>,
    pub service_name: Option<String>,
}

impl TryFrom<&FilterParameters> for SubscriptionFilters {
    type Error = String;

    fn try_from(parameters: &FilterParameters) -> Result<Self, Self::Error> {
        let mut filters = owner_filters(parameters.user_id, parameters.service_name.as_deref());
        let start_date = parse_optional_date(parameters.start_date.as_deref())?;
        let end_date = parse_optional_date(parameters.end_date.as_deref())?;

        if let (Some(start_date), Some(end_date)) = (start_date, end_date) {
            if start_date > end_date {
                return Err(format!(
                    "start_date {} is after end_date {}",
                    start_date.date(),
                    end_date.date()
                ));
            }
        }
        if let Some(start_date) = start_date {
            filters = filters.from_date(start_date.date());
        }
        if let Some(end_date) = end_date {
            filters = filters.until_date(end_date.date());
        }

        Ok(filters)
    }
}

#[tracing::instrument(name = "Listing subscriptions handler", skip(store))]
pub async fn handle_list_subscriptions(
    filters: web::Query<FilterParameters>,
    page: web::Query<PageParameters>,
    store: web::Data<SubscriptionStore>,
) -> Result<HttpResponse, SubscriptionApiError> {
    let filters =
        SubscriptionFilters::try_from(&*filters).map_err(SubscriptionApiError::ValidationError)?;
    let page = Page::new(page.limit, page.offset).map_err(SubscriptionApiError::ValidationError)?;

    let subscriptions = store.list(&filters, page).await?;

    Ok(HttpResponse::Ok().json(subscriptions))
}

#[tracing::instrument(name = "Summarizing subscription costs handler", skip(store))]
pub async fn handle_summarize_costs(
    filters: web::Query<FilterParameters>,
    store: web::Data<SubscriptionStore>,
) -> Result<HttpResponse, SubscriptionApiError> {
    let filters =
        SubscriptionFilters::try_from(&*filters).map_err(SubscriptionApiError::ValidationError)?;

    let summary = store.summarize(&filters).await?;

    Ok(HttpResponse::Ok().json(summary))
}

#[tracing::instrument(name = "Summarizing subscription costs on a date handler", skip(store))]
pub async fn handle_summarize_costs_on_date(
    date: web::Path<String>,
    owner: web::Query<OwnerParameters>,
    store: web::Data<SubscriptionStore>,
) -> Result<HttpResponse, SubscriptionApiError> {
    let date = BillingDate::parse(&date).map_err(SubscriptionApiError::ValidationError)?;
    let filters = owner_filters(owner.user_id, owner.service_name.as_deref()).active_on(date.date());

    let summary = store.summarize(&filters).await?;

    Ok(HttpResponse::Ok().json(summary))
}

fn owner_filters(user_id: Option<Uuid>, service_name: Option<&str>) -> SubscriptionFilters {
    let mut filters = SubscriptionFilters::new();

    if let Some(user_id) = user_id {
        filters = filters.for_user(user_id);
    }
    if let Some(service_name) = service_name {
        filters = filters.with_service_name(service_name);
    }

    filters
}

fn parse_optional_date(date: Option<&str>) -> Result<Option<BillingDate>, String> {
    date.filter(|date| !date.trim().is_empty())
        .map(BillingDate::parse)
        .transpose()
}
