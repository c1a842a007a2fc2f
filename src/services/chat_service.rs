use chrono::Utc;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::{
    chatbot::menu_context,
    dto::chat::{ChatReply, ChatRequest, ChatTestReply, ChatbotStatus},
    entity::products::{Column as ProductCol, Entity as Products},
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    services::product_service::{fetch_todays_specials, product_from_entity},
    state::AppState,
};

async fn load_menu(state: &AppState) -> AppResult<String> {
    let products: Vec<_> = Products::find()
        .filter(ProductCol::Available.eq(true))
        .order_by_asc(ProductCol::Category)
        .order_by_asc(ProductCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();
    let specials = fetch_todays_specials(&state.orm).await?;
    Ok(menu_context(&state.config.business.name, &products, &specials))
}

fn require_message(payload: &ChatRequest) -> AppResult<&str> {
    let message = payload.message.trim();
    if message.is_empty() {
        return Err(AppError::BadRequest("message is required".into()));
    }
    Ok(message)
}

/// Website chat. A failure to build the answer still yields a reply,
/// flagged with `status: "error"`.
pub async fn chat(state: &AppState, payload: ChatRequest) -> AppResult<ApiResponse<ChatReply>> {
    let message = require_message(&payload)?;

    let reply = match load_menu(state).await {
        Ok(menu) => ChatReply {
            message: state.chatbot.respond(message, &menu).await,
            timestamp: Utc::now(),
            status: "success".to_string(),
        },
        Err(err) => {
            tracing::warn!(error = %err, "chat reply failed");
            ChatReply {
                message: state.chatbot.error_reply(),
                timestamp: Utc::now(),
                status: "error".to_string(),
            }
        }
    };

    Ok(ApiResponse::success("Chat reply", reply, Some(Meta::empty())))
}

pub async fn test_chatbot(
    state: &AppState,
    payload: ChatRequest,
) -> AppResult<ApiResponse<ChatTestReply>> {
    let message = require_message(&payload)?;
    let menu = load_menu(state).await?;
    let bot_response = state.chatbot.respond(message, &menu).await;

    Ok(ApiResponse::success(
        "Chatbot test",
        ChatTestReply {
            success: true,
            user_message: message.to_string(),
            bot_response,
            timestamp: Utc::now(),
        },
        Some(Meta::empty()),
    ))
}

pub async fn chatbot_status(state: &AppState) -> AppResult<ApiResponse<ChatbotStatus>> {
    let database_accessible = match Products::find().one(&state.orm).await {
        Ok(found) => found.is_some(),
        Err(err) => {
            tracing::warn!(error = %err, "chatbot catalog check failed");
            false
        }
    };

    Ok(ApiResponse::success(
        "Chatbot status",
        ChatbotStatus {
            openai_configured: state.chatbot.openai_configured(),
            database_accessible,
            business_name: state.chatbot.business().name.clone(),
        },
        Some(Meta::empty()),
    ))
}
