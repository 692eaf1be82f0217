use chrono::NaiveDate;
use claim::assert_ok;
use fake::{faker::company::en::CompanyName, Fake};
use sqlx::{Connection, Executor, PgConnection};
use std::time::Duration;
use uuid::Uuid;

use crate::helpers::TestApp;
use subscription_tracker::domain::Subscription;
use subscription_tracker::startup::get_subscription_store;
use subscription_tracker::store::{CostSummary, Page, StoreError, SubscriptionFilters};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn subscription(
    service_name: &str,
    price: i32,
    user_id: Uuid,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
) -> Subscription {
    Subscription {
        id: Uuid::new_v4(),
        service_name: service_name.to_string(),
        price,
        user_id,
        start_date,
        end_date,
    }
}

#[tokio::test]
async fn created_subscription_is_returned_by_get() {
    let test_app = TestApp::spawn_app().await;
    let service_name: String = CompanyName().fake();
    let new_subscription = subscription(&service_name, 400, Uuid::new_v4(), date(2025, 7, 1), None);

    assert_ok!(test_app.store.create(&new_subscription).await);

    let stored = test_app.store.get(new_subscription.id).await.unwrap();

    assert_eq!(stored, new_subscription);
}

#[tokio::test]
async fn creating_a_duplicated_id_is_a_constraint_violation() {
    let test_app = TestApp::spawn_app().await;
    let new_subscription = subscription("Netflix", 10, Uuid::new_v4(), date(2025, 7, 1), None);

    test_app.store.create(&new_subscription).await.unwrap();
    let result = test_app.store.create(&new_subscription).await;

    assert!(matches!(result, Err(StoreError::ConstraintViolation(_))));
}

#[tokio::test]
async fn get_of_unknown_id_is_not_found() {
    let test_app = TestApp::spawn_app().await;

    let result = test_app.store.get(Uuid::new_v4()).await;

    assert!(matches!(result, Err(StoreError::NotFound)));
}

#[tokio::test]
async fn update_of_unknown_id_is_not_found() {
    let test_app = TestApp::spawn_app().await;
    let missing = subscription("Netflix", 10, Uuid::new_v4(), date(2025, 7, 1), None);

    let result = test_app.store.update(&missing).await;

    assert!(matches!(result, Err(StoreError::NotFound)));
}

#[tokio::test]
async fn delete_of_unknown_id_is_not_found() {
    let test_app = TestApp::spawn_app().await;

    let result = test_app.store.delete(Uuid::new_v4()).await;

    assert!(matches!(result, Err(StoreError::NotFound)));
}

#[tokio::test]
async fn update_overwrites_every_mutable_field() {
    let test_app = TestApp::spawn_app().await;
    let original = subscription("Netflix", 10, Uuid::new_v4(), date(2025, 7, 1), None);
    test_app.store.create(&original).await.unwrap();

    let changed = Subscription {
        service_name: String::from("Netflix Premium"),
        price: 15,
        end_date: Some(date(2025, 12, 31)),
        ..original.clone()
    };
    test_app.store.update(&changed).await.unwrap();

    assert_eq!(test_app.store.get(original.id).await.unwrap(), changed);
}

#[tokio::test]
async fn deleted_subscription_is_gone() {
    let test_app = TestApp::spawn_app().await;
    let new_subscription = subscription("Netflix", 10, Uuid::new_v4(), date(2025, 7, 1), None);
    test_app.store.create(&new_subscription).await.unwrap();

    test_app.store.delete(new_subscription.id).await.unwrap();

    assert!(test_app
        .store
        .get(new_subscription.id)
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
async fn summary_without_filters_sums_every_row() {
    let test_app = TestApp::spawn_app().await;
    let prices = [400, 10, 299, 1];

    for price in prices {
        let new_subscription =
            subscription("Spotify", price, Uuid::new_v4(), date(2025, 1, 1), None);
        test_app.store.create(&new_subscription).await.unwrap();
    }

    let summary = test_app.store.summarize(&SubscriptionFilters::new()).await.unwrap();

    assert_eq!(
        summary,
        CostSummary {
            total_cost: prices.iter().map(|price| *price as i64).sum(),
            count: prices.len() as i64,
        }
    );
}

#[tokio::test]
async fn summary_matching_nothing_is_zero() {
    let test_app = TestApp::spawn_app().await;
    let new_subscription = subscription("Spotify", 10, Uuid::new_v4(), date(2025, 1, 1), None);
    test_app.store.create(&new_subscription).await.unwrap();

    let filters = SubscriptionFilters::new().for_user(Uuid::new_v4());
    let summary = test_app.store.summarize(&filters).await.unwrap();

    assert_eq!(summary, CostSummary::default());
}

#[tokio::test]
async fn open_ended_subscription_outside_the_window_is_not_counted() {
    let test_app = TestApp::spawn_app().await;
    let netflix = subscription("Netflix", 10, Uuid::new_v4(), date(2025, 7, 1), None);
    test_app.store.create(&netflix).await.unwrap();

    let everything = test_app.store.summarize(&SubscriptionFilters::new()).await.unwrap();
    let june = SubscriptionFilters::new()
        .from_date(date(2025, 6, 1))
        .until_date(date(2025, 6, 30));
    let june_summary = test_app.store.summarize(&june).await.unwrap();

    assert_eq!(everything, CostSummary { total_cost: 10, count: 1 });
    assert_eq!(june_summary, CostSummary::default());
}

#[tokio::test]
async fn summary_on_a_date_counts_only_active_subscriptions() {
    let test_app = TestApp::spawn_app().await;
    let bounded = subscription(
        "Netflix",
        10,
        Uuid::new_v4(),
        date(2025, 1, 1),
        Some(date(2025, 3, 1)),
    );
    test_app.store.create(&bounded).await.unwrap();

    let during = SubscriptionFilters::new().active_on(date(2025, 2, 15));
    let after = SubscriptionFilters::new().active_on(date(2025, 4, 1));

    assert_eq!(
        test_app.store.summarize(&during).await.unwrap(),
        CostSummary { total_cost: 10, count: 1 }
    );
    assert_eq!(
        test_app.store.summarize(&after).await.unwrap(),
        CostSummary::default()
    );
}

#[tokio::test]
async fn composed_filters_return_the_intersection() {
    let test_app = TestApp::spawn_app().await;
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let stored = vec![
        subscription("Netflix", 10, alice, date(2025, 1, 1), None),
        subscription("Yandex Plus", 400, alice, date(2025, 1, 1), None),
        subscription("netflix", 12, bob, date(2025, 1, 1), None),
    ];

    for new_subscription in &stored {
        test_app.store.create(new_subscription).await.unwrap();
    }

    let by_user = SubscriptionFilters::new().for_user(alice);
    let by_name = SubscriptionFilters::new().with_service_name("NETFLIX");
    let combined = SubscriptionFilters::new()
        .for_user(alice)
        .with_service_name("NETFLIX");

    let listed = test_app.store.list(&combined, Page::all()).await.unwrap();
    let expected: Vec<Subscription> = stored
        .iter()
        .filter(|subscription| by_user.matches(subscription) && by_name.matches(subscription))
        .cloned()
        .collect();

    assert_eq!(listed, expected);
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn like_wildcards_in_service_name_filter_are_literal() {
    let test_app = TestApp::spawn_app().await;
    let new_subscription = subscription("Netflix", 10, Uuid::new_v4(), date(2025, 1, 1), None);
    test_app.store.create(&new_subscription).await.unwrap();

    let filters = SubscriptionFilters::new().with_service_name("%");
    let listed = test_app.store.list(&filters, Page::all()).await.unwrap();

    assert!(listed.is_empty());
}

#[tokio::test]
async fn list_is_paged_in_start_date_order() {
    let test_app = TestApp::spawn_app().await;
    let user_id = Uuid::new_v4();

    for month in [3, 1, 2, 5, 4] {
        let new_subscription =
            subscription("Spotify", 10, user_id, date(2025, month, 1), None);
        test_app.store.create(&new_subscription).await.unwrap();
    }

    let page = Page::new(Some(2), Some(1)).unwrap();
    let listed = test_app
        .store
        .list(&SubscriptionFilters::new(), page)
        .await
        .unwrap();

    let start_dates: Vec<NaiveDate> = listed.iter().map(|s| s.start_date).collect();
    assert_eq!(start_dates, vec![date(2025, 2, 1), date(2025, 3, 1)]);
}

#[tokio::test]
async fn statement_past_the_deadline_is_cancelled_by_the_server() {
    let test_app = TestApp::spawn_app().await;
    let mut db_settings = test_app.db_settings.clone();
    db_settings.query_timeout_milliseconds = 200;
    let store = get_subscription_store(&db_settings);

    let mut locker = PgConnection::connect_with(&test_app.db_settings.get_db_options())
        .await
        .expect("Failed to connect to Postgres.");
    let mut transaction = locker.begin().await.expect("Failed to begin transaction.");
    transaction
        .execute("LOCK TABLE subscriptions IN ACCESS EXCLUSIVE MODE")
        .await
        .expect("Failed to lock subscriptions.");

    let result = store.summarize(&SubscriptionFilters::new()).await;

    assert!(matches!(result, Err(StoreError::Timeout)));

    tokio::time::sleep(Duration::from_secs(1)).await;

    let waiting: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM pg_stat_activity \
         WHERE datname = current_database() AND state = 'active' AND wait_event_type = 'Lock'",
    )
    .fetch_one(&mut transaction)
    .await
    .expect("Failed to read pg_stat_activity.");

    assert_eq!(waiting, 0);

    transaction.rollback().await.expect("Failed to roll back.");
}
