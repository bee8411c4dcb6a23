//! The translation engine: OpenAI-compatible surface in, 1min.ai
//! conversation protocol out.

pub mod assemble;
pub mod auth;
pub mod errors;
pub mod handler;
pub mod pool;
pub mod router;
pub mod session;
pub mod sse;
pub mod stream;
pub mod translate;
pub mod types;
pub mod upstream;

pub use errors::{ProxyError, ProxyResult};
pub use router::{routes, SharedState};

#[cfg(test)]
mod session_test;
