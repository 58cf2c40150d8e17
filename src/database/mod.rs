pub mod connection;
pub mod games;
pub mod models;
pub mod players;
pub mod schema;
pub mod snapshot;

pub use connection::{DbConn, DbPool, create_pool, get_connection};
pub use models::*;
pub use schema::EntityKind;
