use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{Router, middleware};
use tower_http::trace::TraceLayer;

use user_admin::{
    admin::{self, AdminSite},
    config::AppConfig,
    db::connection,
    logging::init_tracing,
    middleware::{catch_panic_layer, json_error_middleware},
    routes::router,
    services::ServiceContext,
    state::AppState,
};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        tracing::error!("server failed: {err:?}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::from_env()?;
    init_tracing(&cfg.logging.rust_log);

    let db_cfg = cfg
        .database
        .as_ref()
        .context("database configuration is required (APP_DATABASE__URL)")?;
    let db = connection::connect(db_cfg).await?;

    let mut site = AdminSite::with_builtin_models();
    admin::setup(&mut site)?;

    let services = ServiceContext::new(&db).with_list_per_page(cfg.admin.list_per_page);
    if let Some((email, password)) = cfg.admin.superuser() {
        services
            .user_admin()
            .ensure_superuser(email, password)
            .await
            .context("superuser seed failed")?;
    }

    let state = AppState::new(cfg, db, site);

    let app = Router::new()
        .merge(router(Arc::clone(&state)))
        .layer(middleware::from_fn(json_error_middleware))
        .layer(catch_panic_layer())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!(
        "{}:{}",
        state.config.general.host, state.config.general.port
    )
    .parse()
    .context("invalid host/port")?;
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
