//! Database layer for the briefing intake service.
//!
//! Provides SQLite connection pooling (via `r2d2`), WAL-mode initialization,
//! embedded SQL migrations, and the runtime settings that tune both. The only
//! table in the system, `clientes`, is created through a versioned migration
//! managed by this crate.
//!
//! # Design decisions
//!
//! - **SQLite with WAL mode**: a single-file store is the whole persistence
//!   requirement here — no external database process. WAL mode allows
//!   concurrent readers with a single writer, which matches the intake access
//!   pattern (many listing reads, occasional form submissions).
//! - **`r2d2` connection pool**: every request borrows a connection and the
//!   pool guard returns it on every exit path, success or error.
//! - **Embedded migrations**: SQL files are compiled into the binary via
//!   `include_str!`, ensuring the schema ships with the server and cannot
//!   drift from the code that depends on it.

mod migrations;
mod pool;

pub use migrations::run_migrations;
pub use pool::{create_pool, DbPool, DbRuntimeSettings};
