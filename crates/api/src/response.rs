//! Shared response envelope types for API handlers.
//!
//! Use these instead of ad-hoc `serde_json::json!` wrappers to get
//! compile-time type safety and consistent response shapes.

use serde::Serialize;
use vlab_core::community::PageInfo;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "result": T }` envelope returned by the generation proxy.
#[derive(Debug, Serialize)]
pub struct ResultResponse<T: Serialize> {
    pub result: T,
}

/// A page of rows plus pagination metadata.
#[derive(Debug, Serialize)]
pub struct PagedResponse<T: Serialize> {
    pub data: Vec<T>,
    pub pagination: PageInfo,
}
