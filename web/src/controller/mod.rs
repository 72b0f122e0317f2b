use serde::Serialize;
pub(crate) mod board_controller;
pub(crate) mod card_controller;
pub(crate) mod column_controller;
pub(crate) mod health_check_controller;
pub(crate) mod user_controller;
pub(crate) mod user_session_controller;

#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status_code: u16, data: T) -> Self {
        Self {
            status_code,
            data: Some(data),
            message: None,
        }
    }

    pub fn with_message(status_code: u16, message: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            status_code,
            data: None,
            message: Some(message.into()),
        }
    }
}
