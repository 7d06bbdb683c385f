//! Functional core for the jpashop order API.
//!
//! Domain entities, response records, pure shaping and grouping, the
//! repository traits the server implements, and one loader per fetch
//! strategy. Nothing here performs I/O on its own.

pub mod order;
pub mod query;
pub mod storage;
