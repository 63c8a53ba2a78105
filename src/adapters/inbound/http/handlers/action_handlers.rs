use axum::{
    extract::{rejection::FormRejection, State},
    Form, Json,
};
use http::StatusCode;
use subtle::ConstantTimeEq;
use tracing::{info, warn};

use crate::adapters::inbound::http::{
    dto::{ActionRequestDto, ActionResponseDto},
    router::AppState,
};

pub const TEST_CONNECTION_ACTION: &str = "as3cf_bunny_test_connection";
pub const PURGE_ALL_ACTION: &str = "as3cf_bunny_purge_all";

const CONNECTION_SUCCEEDED: &str = "Connection to Bunny.net Storage succeeded.";
const CACHE_PURGED: &str = "Bunny CDN cache purged.";
const INVALID_TOKEN: &str = "Invalid security token.";

/// Actions the settings screen can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderAction {
    TestConnection,
    PurgeAll,
}

impl ProviderAction {
    pub fn parse(action: &str) -> Option<Self> {
        match action {
            TEST_CONNECTION_ACTION => Some(Self::TestConnection),
            PURGE_ALL_ACTION => Some(Self::PurgeAll),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TestConnection => TEST_CONNECTION_ACTION,
            Self::PurgeAll => PURGE_ALL_ACTION,
        }
    }
}

/// Handle `POST /ajax`
pub async fn handle_action(
    State(state): State<AppState>,
    form: Result<Form<ActionRequestDto>, FormRejection>,
) -> (StatusCode, Json<ActionResponseDto>) {
    let Form(request) = match form {
        Ok(form) => form,
        Err(rejection) => {
            warn!("Rejected malformed action request: {}", rejection.body_text());
            return (
                StatusCode::BAD_REQUEST,
                Json(ActionResponseDto::failure(rejection.body_text())),
            );
        }
    };

    if !token_matches(&state.action_token, &request.nonce) {
        warn!(action = %request.action, "Rejected action with invalid token");
        return (
            StatusCode::FORBIDDEN,
            Json(ActionResponseDto::failure(INVALID_TOKEN)),
        );
    }

    let Some(action) = ProviderAction::parse(&request.action) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ActionResponseDto::failure(format!(
                "Unknown action: {}",
                request.action
            ))),
        );
    };

    let outcome = match action {
        ProviderAction::TestConnection => state
            .provider
            .test_connection()
            .await
            .map(|_| CONNECTION_SUCCEEDED),
        ProviderAction::PurgeAll => state.provider.purge_all().await.map(|_| CACHE_PURGED),
    };

    // Failures are reported in the envelope; the caller only reads `success`.
    let response = match outcome {
        Ok(message) => {
            info!(action = action.as_str(), "Action succeeded");
            ActionResponseDto::success(message)
        }
        Err(err) => {
            warn!(action = action.as_str(), code = err.code(), "Action failed: {}", err);
            ActionResponseDto::failure(err.to_string())
        }
    };

    (StatusCode::OK, Json(response))
}

// An unset token never matches.
fn token_matches(expected: &str, given: &str) -> bool {
    !expected.is_empty() && bool::from(expected.as_bytes().ct_eq(given.as_bytes()))
}
