use diesel::prelude::*;
use diesel::r2d2::ConnectionManager;
use diesel::r2d2::Pool;
use crate::config;

pub type PgPool = Pool<ConnectionManager<PgConnection>>;

pub fn get_connection_pool() -> PgPool {
    let manager = ConnectionManager::<PgConnection>::new(config::database_url());
    // Connections are opened on first checkout; a bad DATABASE_URL surfaces as a
    // pool error inside the handler instead of a panic here.
    Pool::builder()
        .max_size(16)
        .build_unchecked(manager)
}
