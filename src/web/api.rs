//! JSON envelope and pagination helpers shared by every endpoint.

use crate::app_config::APP_CONFIG;
use serde::{Deserialize, Serialize};

/// Uniform response envelope: success flag, message, optional payload.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: "Operation successful".to_string(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// A payload-free success with a human-readable message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PagedResponse<T: Serialize> {
    pub items: Vec<T>,
    pub page: u64,
    pub total_pages: u64,
    pub total_items: u64,
}

impl<T: Serialize> PagedResponse<T> {
    pub fn new(items: Vec<T>, page: u64, total_pages: u64, total_items: u64) -> Self {
        Self {
            items,
            page,
            total_pages,
            total_items,
        }
    }
}

/// Zero-based page selection, capped to keep responses bounded.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl PageQuery {
    pub fn resolve(&self) -> (u64, u64) {
        let page = self.page.unwrap_or(0);
        let per_page = self
            .per_page
            .unwrap_or(APP_CONFIG.limits.per_page)
            .clamp(1, 100);
        (page, per_page)
    }
}
