pub mod app_config;
pub mod booking_repo;
pub mod cache;
pub mod database;
pub mod flight_repo;
pub mod memory;
pub mod payment_repo;

pub use cache::{CacheNamespace, CacheStore, MemoryStore, RedisStore, ResultCache};
pub use database::DbClient;
