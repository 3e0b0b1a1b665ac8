use anyhow::Result;
use aws_config::BehaviorVersion;
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod error;
mod jwt;
mod middleware;
mod models;
mod repositories;
mod routes;
mod state;
mod storage;
mod validation;

use common::database::{DatabaseConfig, health_check, init_pool};

use crate::{
    jwt::{JwtConfig, JwtService},
    repositories::{OrderRepository, ProductRepository, UserRepository},
    state::AppState,
    storage::{ImageStore, StorageConfig},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    info!("Starting storefront API service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    // Initialize JWT service
    let jwt_config = JwtConfig::from_env()?;
    let jwt_service = JwtService::new(jwt_config);

    // Initialize S3-backed image storage
    let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let s3_client = aws_sdk_s3::Client::new(&aws_config);
    let image_store = ImageStore::new(s3_client, StorageConfig::from_env());

    // Initialize repositories
    let user_repository = UserRepository::new(pool.clone());
    let product_repository = ProductRepository::new(pool.clone());
    let order_repository = OrderRepository::new(pool.clone());

    let app_state = AppState {
        db_pool: pool,
        jwt_service,
        user_repository,
        product_repository,
        order_repository,
        image_store,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let port = env::var("PORT").unwrap_or_else(|_| "5000".to_string());
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Storefront API listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
