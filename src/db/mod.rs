//! Database module: models, schema and per-domain stores.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - one storage struct per domain, each owning a pool handle

pub mod credentials;
pub mod events;
pub mod models;
pub mod records;
pub mod schema;
pub mod sessions;
pub mod users;

pub use credentials::{CredentialsStorage, SqlitePool};
pub use events::{EventsStorage, SyncedEvent};
pub use models::{
    Address, AddressType, CalendarEventRecord, Client, Dog, DogStatus, Sex, StoredCredential, User,
};
pub use records::{
    AddressFields, AddressesStorage, ClientFields, ClientsStorage, DogFields, DogsStorage,
};
pub use schema::SQLITE_INIT;
pub use sessions::SessionStorage;
pub use users::UsersStorage;

use crate::error::HubError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

/// Open (creating if missing) the SQLite database and run the bundled DDL.
pub async fn connect(database_url: &str) -> Result<SqlitePool, HubError> {
    let connect_opts = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
    init_schema(&pool).await?;
    Ok(pool)
}

/// Execute the bundled DDL statement-by-statement (SQLite accepts
/// multi-command scripts but sqlx::query does not).
pub async fn init_schema(pool: &SqlitePool) -> Result<(), HubError> {
    for stmt in SQLITE_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(pool).await?;
    }
    Ok(())
}
