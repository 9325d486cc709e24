//! Handlers for the gateway's backing resources.

pub mod bus_redis;
pub mod registry_postgres;
pub mod storage_http;
