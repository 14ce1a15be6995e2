//! HTTP boundary for the counter service.
//!
//! - `GET  /v1/likes/{slug}` : current count
//! - `POST /v1/likes/{slug}` : atomic increment, returns the new count
//!
//! The slug is the remainder of the path, so `post/hello` is addressable as
//! `/v1/likes/post/hello`. The slug is never rewritten; `/v1/likes/%2Fx`
//! addresses the slug `/x`, and `/v1/likes/` the (rejected) empty slug.

pub mod error;
pub mod likes;

pub use error::ApiError;
