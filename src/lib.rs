//! # Eiscafé
//!
//! > **Order taking and kitchen board for a small ice-cream café.**
//!
//! Customers put together an order on a tablet (scoops, toppings, drinks, coffee). The
//! kitchen screen polls the orders, shows them newest first, lets the staff tick them off,
//! and quietly removes anything older than half an hour.
//!
//! ## 🏗️ Design
//!
//! There is no push channel between the two sides. The form writes into a datastore, the
//! kitchen reads from it on a timer. Everything in between is a [`Datastore`](store::Datastore)
//! with four operations.
//!
//! ### The draft is a state machine
//! [`OrderDraft`](model::OrderDraft) only changes through its transition methods, so the
//! rules ("drinks only clears the scoops", "no coffee extras without a coffee type", "scoop
//! counts never go negative") hold after every edit. The coffee choice is an explicit enum
//! ([`CoffeeSelection`](model::CoffeeSelection)) rather than a pair of loose fields.
//!
//! ### The kitchen is a cache
//! A [`KitchenView`](kitchen::KitchenView) never edits orders. It replaces its list with
//! whatever the last refresh returned, deletes by id, and lets the store decide what
//! "older than" means.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Data ([`model`])
//! - **Role**: The draft the customer edits, the record the kitchen reads, and the row the
//!   store persists.
//! - **Key items**: [`OrderDraft`](model::OrderDraft), [`OrderRecord`](model::OrderRecord),
//!   [`OrderRow`](model::OrderRow).
//!
//! ### 2. The Storage ([`store`])
//! - **Role**: Where orders live. An in-memory actor by default, a hosted REST table in
//!   production, a mock in tests.
//! - **Key items**: [`Datastore`](store::Datastore), [`MemoryStore`](store::MemoryStore),
//!   [`RestDatastore`](store::RestDatastore), [`MockDatastore`](store::mock::MockDatastore).
//!
//! ### 3. The Two Screens ([`order_form`], [`kitchen`])
//! - **Role**: Submit with validation and a double-submit guard; poll, render, delete and
//!   purge.
//! - **Key items**: [`OrderForm`](order_form::OrderForm), [`KitchenView`](kitchen::KitchenView),
//!   [`OrderCard`](kitchen::OrderCard).
//!
//! ### 4. The Orchestrator ([`lifecycle`])
//! - **Role**: Configuration, logging, start-up and shutdown.
//! - **Key items**: [`CafeSystem`](lifecycle::CafeSystem), [`CafeConfig`](lifecycle::CafeConfig).
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # In-memory store, info logs
//! cargo run
//!
//! # Against a hosted table
//! EISCAFE_STORE__BACKEND=rest \
//! EISCAFE_STORE__URL=https://<project>.supabase.co \
//! EISCAFE_STORE__API_KEY=<anon key> \
//! RUST_LOG=debug cargo run
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod kitchen;
pub mod lifecycle;
pub mod model;
pub mod order_form;
pub mod store;
