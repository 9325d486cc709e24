//! HTTP retrieval utilities.

pub mod act_http;
