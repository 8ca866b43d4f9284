//! `ReqShape` Server — HTTP listener over the request-shape engine.
//!
//! The server learns request shapes through `POST /models` and answers
//! conformance questions through `POST /validate`; all schema logic lives
//! in `reqshape-core`. This crate owns route wiring, status-code mapping,
//! middleware, and graceful shutdown.

pub mod network;

pub use network::{AppState, NetworkConfig, NetworkModule};
