//! Request and response data structures

pub mod prediction;
pub mod request;
