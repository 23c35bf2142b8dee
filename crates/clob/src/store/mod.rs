//! Store layer for the order-book engine
//!
//! The engine itself is synchronous and deterministic; this layer wraps it
//! for async callers (the API surface lives outside this workspace) and
//! stamps the wall clock onto each call.

pub mod memory;
pub mod traits;

pub use memory::InMemoryClobStore;
pub use traits::ClobStore;
