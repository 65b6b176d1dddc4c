//! Core type definitions

pub mod conversation;
pub mod message;
pub mod request;
pub mod response;
pub mod stream;
