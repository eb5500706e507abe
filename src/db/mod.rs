pub mod postgres;
pub mod store;

#[cfg(test)]
pub mod memory;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub use postgres::PgEmployeeStore;
pub use store::{EmployeeStore, EmployeeTx};

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}
