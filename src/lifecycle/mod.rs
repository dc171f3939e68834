//! Start-up, configuration and shutdown.
//!
//! # Main Components
//!
//! - [`CafeSystem`] - starts the datastore and hands out order forms and kitchen views
//! - [`CafeConfig`] - file and environment configuration
//! - [`setup_tracing`] - initializes logging

pub mod cafe_system;
pub mod config;
pub mod tracing;

pub use cafe_system::*;
pub use config::*;
pub use self::tracing::*;
