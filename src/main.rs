use activity_feed::application::context::AppContext;
use activity_feed::config;
use activity_feed::infrastructure::db::postgres::PostgresDatabase;
use activity_feed::infrastructure::db::stores::Stores;
use activity_feed::infrastructure::flags::SettingsFlagService;
use activity_feed::interface::http;
use activity_feed::interface::http::state::AppState;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Step 1: Load configuration.
    let settings = config::load().expect("load config");

    // Step 2: Install logging and the metrics recorder.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let metrics_handle = PrometheusBuilder::new().install_recorder().ok();

    // Step 3: Connect to the database.
    let db = Arc::new(
        PostgresDatabase::connect(&settings.db.url)
            .await
            .expect("connect database"),
    );

    // Step 4: Build stores and the flag service.
    let stores = Stores::postgres(db);
    let flags = Arc::new(SettingsFlagService::new(settings.flags.clone()));

    // Step 5: Assemble shared application context and HTTP state.
    let ctx = AppContext::new(stores, flags, settings.deployment.self_hosted);
    let state = AppState {
        ctx: Arc::new(ctx),
        settings: settings.clone(),
        metrics: metrics_handle,
    };

    // Step 6: Build the HTTP app, bind, and serve.
    let app = http::app(state);
    let bind_addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("bind server");

    axum::serve(listener, app).await.expect("serve");
}
