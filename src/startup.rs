use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

use crate::config::{DatabaseSettings, Settings};
use crate::routes::{
    handle_create_subscription, handle_delete_subscription, handle_get_subscription,
    handle_list_subscriptions, handle_summarize_costs, handle_summarize_costs_on_date,
    handle_update_subscription, health_check,
};
use crate::store::SubscriptionStore;

pub struct Application {
    pub port: u16,
    pub server: Server,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, std::io::Error> {
        let store = get_subscription_store(&config.database);

        let listener = TcpListener::bind(config.get_address())?;
        let port = listener.local_addr()?.port();
        let server = run(listener, store, config.get_shutdown_timeout())?;

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stop(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(
    listener: TcpListener,
    store: SubscriptionStore,
    shutdown_timeout: u64,
) -> Result<Server, std::io::Error> {
    let store = web::Data::new(store);

    let server = HttpServer::new(move || {
        // App is where your application logic lives: routing, middlewares, request handler, etc
        App::new()
            // 'wrap' method adds a middleware to the App. This specific middleware provide incoming
            // request logger
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .service(
                web::scope("/subscriptions")
                    .route("", web::post().to(handle_create_subscription))
                    .route("", web::get().to(handle_list_subscriptions))
                    // Registered before "/{id}" so that "summary" is never read as an id
                    .route("/summary", web::get().to(handle_summarize_costs))
                    .route(
                        "/summary/{date}",
                        web::get().to(handle_summarize_costs_on_date),
                    )
                    .route("/{id}", web::get().to(handle_get_subscription))
                    .route("/{id}", web::put().to(handle_update_subscription))
                    .route("/{id}", web::delete().to(handle_delete_subscription)),
            )
            .app_data(store.clone())
    })
    // Actix stops on SIGINT/SIGTERM and waits this long for in-flight requests
    .shutdown_timeout(shutdown_timeout)
    .listen(listener)?
    .run();

    Ok(server)
}

pub fn get_connection_db_pool(config: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(config.get_acquire_timeout())
        .connect_lazy_with(config.get_db_options())
}

/// Store whose client-side deadline matches the `statement_timeout` of its connections.
pub fn get_subscription_store(config: &DatabaseSettings) -> SubscriptionStore {
    SubscriptionStore::new(get_connection_db_pool(config))
        .with_query_timeout(config.get_query_timeout())
}
