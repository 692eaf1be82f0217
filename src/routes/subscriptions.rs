use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::domain::{
    NewSubscription, NewSubscriptionBody, Subscription, SubscriptionChanges,
    SubscriptionChangesBody,
};
use crate::routes::error::SubscriptionApiError;
use crate::store::SubscriptionStore;

#[tracing::instrument(
    name = "Creating a new subscription handler",
    skip(body, store),
    fields(
        service_name = %body.service_name,
        user_id = %body.user_id
    )
)]
pub async fn handle_create_subscription(
    body: web::Json<NewSubscriptionBody>,
    store: web::Data<SubscriptionStore>,
) -> Result<HttpResponse, SubscriptionApiError> {
    let new_subscription: NewSubscription = body
        .try_into()
        .map_err(SubscriptionApiError::ValidationError)?;
    let subscription = Subscription::from_new(new_subscription);

    store.create(&subscription).await?;

    Ok(HttpResponse::Created().json(subscription))
}

#[tracing::instrument(
    name = "Fetching a subscription handler",
    skip(store),
    fields(subscription_id = %id)
)]
pub async fn handle_get_subscription(
    id: web::Path<Uuid>,
    store: web::Data<SubscriptionStore>,
) -> Result<HttpResponse, SubscriptionApiError> {
    let subscription = store.get(id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(subscription))
}

#[tracing::instrument(
    name = "Updating a subscription handler",
    skip(body, store),
    fields(subscription_id = %id)
)]
pub async fn handle_update_subscription(
    id: web::Path<Uuid>,
    body: web::Json<SubscriptionChangesBody>,
    store: web::Data<SubscriptionStore>,
) -> Result<HttpResponse, SubscriptionApiError> {
    let changes: SubscriptionChanges = body
        .try_into()
        .map_err(SubscriptionApiError::ValidationError)?;
    let subscription = Subscription::with_changes(id.into_inner(), changes);

    store.update(&subscription).await?;

    Ok(HttpResponse::Ok().json(subscription))
}

#[tracing::instrument(
    name = "Deleting a subscription handler",
    skip(store),
    fields(subscription_id = %id)
)]
pub async fn handle_delete_subscription(
    id: web::Path<Uuid>,
    store: web::Data<SubscriptionStore>,
) -> Result<HttpResponse, SubscriptionApiError> {
    store.delete(id.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}
