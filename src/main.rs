use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use nlq_core::{CoreConfig, QueryService, DEFAULT_REST_ADDR, EXAMPLE_QUERIES};

/// Main entry point for the NLQ application
///
/// Starts the REST server that turns natural-language queries into FHIR searches and
/// synthetic Patient bundles.
///
/// # Environment Variables
/// - `NLQ_REST_ADDR`: REST server address (default: "0.0.0.0:5050")
/// - `NLQ_MIN_RECORDS` / `NLQ_MAX_RECORDS`: bounds on the generated record count
/// - `NLQ_MAX_LIST`: cap on "list N" requests
/// - `NLQ_SEED`: fixed rng seed for repeatable demos
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, bind or serve fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("nlq=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("NLQ_REST_ADDR").unwrap_or_else(|_| DEFAULT_REST_ADDR.into());
    let cfg = CoreConfig::from_env().context("invalid NLQ_* configuration")?;
    let query_service = QueryService::new(Arc::new(cfg))?;

    tracing::info!("++ Starting NLQ REST on {}", rest_addr);
    tracing::info!("   POST /query  GET /health  GET /examples  GET /swagger-ui");
    let cfg = query_service.config();
    tracing::info!(
        records = ?cfg.record_count(),
        max_list = cfg.max_list(),
        seed = ?cfg.seed(),
        "query settings"
    );
    for example in EXAMPLE_QUERIES {
        let intent = query_service.extract(example)?;
        tracing::info!(
            action = intent.action.as_str(),
            condition = ?intent.condition,
            age = ?intent.age,
            "example: {}",
            example
        );
    }

    let app = api_rest::router(AppState::new(query_service));
    let listener = tokio::net::TcpListener::bind(&rest_addr)
        .await
        .with_context(|| format!("failed to bind {}", rest_addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
