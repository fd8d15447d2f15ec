//! Hash computation and object identity for the quill repository engine.
//!
//! This crate provides the core `ObjectId` type (a SHA-1 digest), hex
//! encoding/decoding, and the streaming hasher used throughout quill.

mod error;
pub mod hasher;
pub mod hex;
mod oid;

pub use error::HashError;
pub use oid::ObjectId;
