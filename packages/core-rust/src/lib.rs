//! `ReqShape` Core — request-shape learning and validation engine.
//!
//! Learns, from submitted model descriptions, the expected shape of HTTP
//! requests for a (path, method) pair, and reports whether later requests
//! conform. Everything here is in-memory, CPU-bound logic; the network
//! listener lives in `reqshape-server` and calls in through [`Engine`].

pub mod engine;
pub mod schema;
pub mod store;
pub mod types;
pub mod validate;
pub mod validators;

pub use engine::{Engine, RejectedModel, SubmitReport, ValidateError};
pub use schema::{compile_model, CompileError, CompiledModel, SectionSchema};
pub use store::ModelStore;
pub use types::{RouteKey, SectionName, Value};
pub use validate::{validate_request, Discrepancy, DiscrepancyKind, MalformedRequest, Verdict};
pub use validators::{Predicate, TypeTag, ValidatorRegistry};
