//! Application state for the payroll API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::service::PayrollService;

/// Shared application state.
///
/// Contains resources that are shared across all request handlers: the
/// payroll service and the upload size limit.
#[derive(Clone)]
pub struct AppState {
    service: Arc<PayrollService>,
    max_upload_bytes: usize,
}

impl AppState {
    /// Creates a new application state around `service`.
    pub fn new(service: PayrollService, max_upload_bytes: usize) -> Self {
        Self {
            service: Arc::new(service),
            max_upload_bytes,
        }
    }

    /// Returns a reference to the payroll service.
    pub fn service(&self) -> &PayrollService {
        &self.service
    }

    /// Returns the largest accepted request body, in bytes.
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }
}
