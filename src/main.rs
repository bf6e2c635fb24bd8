use dotenvy::dotenv;
use shop_ledger::{
    api,
    config::{self, database},
    core::{context::AppContext, user},
    errors::Result,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; variables may also come from the environment
    dotenv().ok();

    // 3. Load the application configuration
    let app_config = config::load_app_configuration()?;

    // 4. Connect and make sure the schema exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db).await?;

    // 5. Seed the owner account; its id is fixed for the life of the process
    let owner = user::ensure_owner(&db, &app_config.owner.name)
        .await
        .inspect_err(|e| error!("Failed to seed owner account: {}", e))?;

    let ctx = AppContext::new(db, owner.id, app_config.shops.default_shop.clone());
    let app = api::create_app(ctx);

    // 6. Serve until Ctrl-C
    let listener = tokio::net::TcpListener::bind(app_config.server.bind_address.as_str()).await?;
    info!(address = %app_config.server.bind_address, "Listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}
