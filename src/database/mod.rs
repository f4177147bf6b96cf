pub mod connection;
pub mod tx;

pub use connection::{DbPool, create_pool, run_migrations};
pub use tx::{MAX_TX_RETRIES, backoff, is_retryable};
