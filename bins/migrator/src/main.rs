//! Database migration runner for Pitstop.
//!
//! Usage:
//!   migrator up      - Create the attachment and target tables
//!   migrator down    - Drop them again
//!   migrator status  - Show migration status
//!
//! Reads `DATABASE_URL` from the environment or `.env`.

use sea_orm_migration::prelude::*;
use pitstop_db::migration::Migrator;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    cli::run_cli(Migrator).await;
}
