//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the global subscriber: compact single-line output, no module
//! prefix, filtered by `RUST_LOG` or, when that is unset, by the configured `log_filter`.
//!
//! ```bash
//! # Board refreshes and every datastore request
//! RUST_LOG=debug cargo run
//!
//! # Only the kitchen
//! RUST_LOG=eiscafe::kitchen=debug cargo run
//! ```
//!
//! Fields are structured, so a refresh at `debug` reads like:
//!
//! ```text
//! DEBUG Board refreshed count=3
//! INFO submit: Order submitted order_id="order_3"
//! ERROR Failed to delete order order_id="order_1" error=Request failed: ...
//! ```

use tracing_subscriber::EnvFilter;

pub fn setup_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
