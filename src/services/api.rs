//! API request and response types for the preview bridge.

use serde::{Deserialize, Serialize};

use crate::config::CardConfig;
use crate::editor::DeviceOption;
use crate::traits::ServiceCall;

// Re-export shared request types from messages module
pub use crate::messages::{ConfigRequest, ControlRequest};

// ============================================================================
// Response Types
// ============================================================================

/// API response wrapper for consistent JSON structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful
    pub success: bool,
    /// Response data (present when success=true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error message (present when success=false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response with data
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Result of a state push
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatesResponse {
    /// What the push changed: `ignored`, `repaint` or `rebuild`
    pub change: String,
    /// Number of entities in the pushed snapshot
    pub entities: usize,
}

/// Control result response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    /// Whether the control was accepted
    pub accepted: bool,
    /// Control that was applied
    pub result: String,
}

impl CommandResponse {
    /// An accepted control
    pub fn accepted(result: impl Into<String>) -> Self {
        Self {
            accepted: true,
            result: result.into(),
        }
    }
}

/// Service calls recorded since the last collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandsResponse {
    /// Calls, oldest first
    pub commands: Vec<ServiceCall>,
}

/// Trains known to the host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevicesResponse {
    /// Display names
    pub devices: Vec<String>,
    /// Picker entries as the editor shows them
    pub options: Vec<DeviceOption>,
}

/// Applied configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigResponse {
    /// The configuration now in effect
    pub config: CardConfig,
    /// Resulting card title
    pub title: String,
}

impl From<CardConfig> for ConfigResponse {
    fn from(config: CardConfig) -> Self {
        Self {
            title: config.title().to_string(),
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_ok() {
        let resp = ApiResponse::ok(CommandResponse::accepted("horn"));
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains(r#""success":true"#));
        assert!(!json.contains("error"));
    }

    #[test]
    fn test_api_response_err() {
        let resp = ApiResponse::<()>::err("bad control");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains(r#""error":"bad control""#));
        assert!(!json.contains("data"));
    }

    #[test]
    fn test_config_response_title() {
        let config = CardConfig::default().with_device("Polar Express");
        let resp = ConfigResponse::from(config);
        assert_eq!(resp.title, "Polar Express");
    }

    #[test]
    fn test_commands_response_shape() {
        let resp = CommandsResponse {
            commands: vec![ServiceCall::set_value("number.test_throttle", 40.0)],
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["commands"][0]["domain"], "number");
        assert_eq!(json["commands"][0]["service"], "set_value");
        assert_eq!(json["commands"][0]["value"], 40.0);
    }
}
