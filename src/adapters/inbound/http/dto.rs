use serde::{Deserialize, Serialize};

/// Form body of an action request
#[derive(Debug, Clone, Deserialize)]
pub struct ActionRequestDto {
    pub action: String,
    #[serde(default)]
    pub nonce: String,
}

/// Message carried in the `data` field of an action response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionMessageDto {
    pub message: String,
}

/// JSON envelope returned by every action: `{success, data?: {message}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResponseDto {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ActionMessageDto>,
}

impl ActionResponseDto {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(ActionMessageDto {
                message: message.into(),
            }),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: Some(ActionMessageDto {
                message: message.into(),
            }),
        }
    }

    /// Message of the envelope, if any
    pub fn message(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.message.as_str())
    }
}
