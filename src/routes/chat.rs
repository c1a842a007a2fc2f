use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    dto::chat::{ChatReply, ChatRequest, ChatTestReply, ChatbotStatus},
    error::AppResult,
    response::ApiResponse,
    services::chat_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/chat", post(chat))
        .route("/chatbot/test", post(test_chatbot))
        .route("/chatbot/status", get(chatbot_status))
}

#[utoipa::path(
    post,
    path = "/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Assistant reply", body = ApiResponse<ChatReply>),
        (status = 400, description = "Empty message"),
    ),
    tag = "Chat"
)]
pub async fn chat(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> AppResult<Json<ApiResponse<ChatReply>>> {
    let resp = chat_service::chat(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/chatbot/test",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Echo of the question with the reply", body = ApiResponse<ChatTestReply>),
    ),
    tag = "Chat"
)]
pub async fn test_chatbot(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> AppResult<Json<ApiResponse<ChatTestReply>>> {
    let resp = chat_service::test_chatbot(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/chatbot/status",
    responses(
        (status = 200, description = "Assistant configuration", body = ApiResponse<ChatbotStatus>),
    ),
    tag = "Chat"
)]
pub async fn chatbot_status(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ChatbotStatus>>> {
    let resp = chat_service::chatbot_status(&state).await?;
    Ok(Json(resp))
}
