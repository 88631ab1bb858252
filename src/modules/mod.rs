pub mod books;
pub mod customers;

use bookstore_kernel::ModuleRegistry;
use sqlx::SqlitePool;

/// Register every resource module with the registry, each holding the pool
pub fn register_all(registry: &mut ModuleRegistry, pool: &SqlitePool) {
    registry.register(books::create_module(pool.clone()));
    registry.register(customers::create_module(pool.clone()));
}

/// In-memory database with every module's schema applied.
#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    let pool = bookstore_db::connect(&bookstore_kernel::settings::DatabaseSettings {
        url: "sqlite::memory:".to_string(),
        ..Default::default()
    })
    .await
    .unwrap();

    let mut registry = ModuleRegistry::new();
    register_all(&mut registry, &pool);
    bookstore_db::run_migrations(&pool, &registry).await.unwrap();

    pool
}
