// Database migrations module
// Schema creation is idempotent and runs once when a pool is built

mod sqlite;
pub use sqlite::run_migrations as run_sqlite_migrations;
