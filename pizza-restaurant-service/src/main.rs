use axum::http::HeaderValue;
use clap::Parser;
use dotenvy::dotenv;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pizza_restaurant_service::config::{Cli, Commands, ServeArgs};
use pizza_restaurant_service::handlers::{self, AppState};
use pizza_restaurant_service::{establish_pool, run_migrations, seed, DbPool};

#[tokio::main]
pub async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let pool = establish_pool(&cli.database_url, cli.pool_size, cli.connection_options())?;

    let applied = run_migrations(&mut *pool.get()?)?;
    info!(applied, database_url = %cli.database_url, "database ready");

    match cli.command {
        Commands::Serve(args) => serve(pool, args).await,
        Commands::Migrate => Ok(()),
        Commands::Seed => {
            seed::run(&mut *pool.get()?)?;
            Ok(())
        }
    }
}

async fn serve(
    pool: DbPool,
    args: ServeArgs,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cors = CorsLayer::new()
        .allow_origin(args.cors_origin.parse::<HeaderValue>()?)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    let app = handlers::router(AppState::new(pool))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(args.bind_addr()?).await?;
    info!("Pizza restaurant service listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
