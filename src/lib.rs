pub mod arrange;
pub mod config;
pub mod error;
pub mod fsm;
pub mod geometry;
pub mod guards;
pub mod layout;
pub mod layouts;
pub mod perf;
pub mod session;
pub mod store;
// cmd and reports belong to the binary (main.rs).

pub use error::{TunnelError, TunnelResult};

/// Opaque card identifier, unique within a board snapshot.
pub type CardId = String;
