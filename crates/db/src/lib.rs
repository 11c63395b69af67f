//! PostgreSQL access for job bootstrapping.
//!
//! A job run owns exactly one connection for its whole lifetime; it is not
//! pooled or shared. [`PgSession`] wraps that connection and implements the
//! session traits from `jobsub-core`.

use std::str::FromStr;

use jobsub_core::config::Credential;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;

pub mod models;
pub mod repositories;
pub mod session;

pub use session::PgSession;

/// Open a dedicated connection for `credential`.
///
/// `instance` is `host[:port]/database`.
pub async fn connect(credential: &Credential) -> Result<PgConnection, sqlx::Error> {
    let options = PgConnectOptions::from_str(&format!("postgres://{}", credential.instance))?
        .username(&credential.username)
        .password(&credential.password);
    PgConnection::connect_with(&options).await
}

/// Simple health check: executes `SELECT 1`.
pub async fn health_check(conn: &mut PgConnection) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(conn).await?;
    Ok(())
}
