use sqlx::PgPool;

use crate::{
    jwt::JwtService,
    repositories::{OrderRepository, ProductRepository, UserRepository},
    storage::ImageStore,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_service: JwtService,
    pub user_repository: UserRepository,
    pub product_repository: ProductRepository,
    pub order_repository: OrderRepository,
    pub image_store: ImageStore,
}
