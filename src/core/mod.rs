//! Core request handling
//!
//! This module contains the logic between the HTTP surface and the provider.

mod chat;

pub use chat::{ChatEngine, ChatError};
