//! Operation Context
//!
//! Request metadata carried into handlers so their log lines can be
//! correlated with the HTTP request that triggered them.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use uuid::Uuid;

/// Context for an operation, used for tracing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationContext {
    /// Correlation ID for request tracing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<Uuid>,

    /// Client IP address as reported by the proxy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_ip: Option<IpAddr>,
}

impl OperationContext {
    /// Create a new empty context
    pub fn new() -> Self {
        Self {
            correlation_id: None,
            client_ip: None,
        }
    }

    pub fn with_correlation_id(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    pub fn with_client_ip(mut self, ip: IpAddr) -> Self {
        self.client_ip = Some(ip);
        self
    }
}

impl Default for OperationContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_builder() {
        let correlation_id = Uuid::new_v4();
        let ip: IpAddr = "10.0.0.7".parse().unwrap();

        let context = OperationContext::new()
            .with_correlation_id(correlation_id)
            .with_client_ip(ip);

        assert_eq!(context.correlation_id, Some(correlation_id));
        assert_eq!(context.client_ip, Some(ip));
    }
}
