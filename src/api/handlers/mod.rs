use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use super::{ApiError, AppState};
use crate::llm::parse::{self, Extraction};
use crate::models::*;

fn note_not_found() -> ApiError {
    ApiError::NotFound("Note not found".to_string())
}

fn unsupported_language() -> ApiError {
    ApiError::Validation("Unsupported language. Allowed: [Chinese, English, Japanese]".to_string())
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Notes
// ============================================================

pub async fn list_notes(State(state): State<AppState>) -> Result<Json<Vec<Note>>, ApiError> {
    Ok(Json(state.db.list_notes()?))
}

pub async fn get_note(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Note>, ApiError> {
    state.db.get_note(id)?.map(Json).ok_or_else(note_not_found)
}

pub async fn create_note(
    State(state): State<AppState>,
    Json(input): Json<CreateNoteInput>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let (title, content) = match (input.title, input.content) {
        (Some(t), Some(c)) if !t.is_empty() && !c.is_empty() => (t, c),
        _ => {
            return Err(ApiError::Validation(
                "Title and content are required".to_string(),
            ))
        }
    };

    let note = state.db.create_note(
        title,
        content,
        input.tags.unwrap_or_default(),
        input.event_date,
        input.event_time,
    )?;

    Ok((StatusCode::CREATED, Json(note)))
}

pub async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateNoteInput>,
) -> Result<Json<Note>, ApiError> {
    state
        .db
        .update_note(id, input)?
        .map(Json)
        .ok_or_else(note_not_found)
}

pub async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if state.db.delete_note(id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(note_not_found())
    }
}

/// Query parameters for searching notes.
#[derive(Debug, Deserialize)]
pub struct SearchNotesQuery {
    #[serde(default)]
    pub q: String,
}

/// Substring search over title, content and tag text.
///
/// An empty query returns an empty result, not all notes. That mirrors the
/// behavior clients already depend on; it is suspect as a product decision
/// but preserved deliberately.
pub async fn search_notes(
    State(state): State<AppState>,
    Query(query): Query<SearchNotesQuery>,
) -> Result<Json<Vec<Note>>, ApiError> {
    if query.q.is_empty() {
        return Ok(Json(Vec::new()));
    }
    Ok(Json(state.db.search_notes(&query.q)?))
}

// ============================================================
// LLM operations
// ============================================================

/// Translate a note's title and content, leaving the stored note untouched.
pub async fn translate_note(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<TranslateNoteInput>,
) -> Result<Json<TranslatedNote>, ApiError> {
    let language = input
        .language
        .as_deref()
        .and_then(Language::from_str)
        .ok_or_else(unsupported_language)?;

    let note = state.db.get_note(id)?.ok_or_else(note_not_found)?;

    let title = state.llm.translate(language, &note.title).await?;
    let content = state.llm.translate(language, &note.content).await?;

    Ok(Json(TranslatedNote {
        id: note.id,
        title,
        content,
    }))
}

/// Generate a structured note proposal from free-form input.
///
/// The result is returned to the client only; nothing is persisted until
/// the client issues a separate create call.
pub async fn generate_note(
    State(state): State<AppState>,
    Json(input): Json<GenerateNoteInput>,
) -> Result<Json<GeneratedNote>, ApiError> {
    let user_input = input.input.unwrap_or_default().trim().to_string();
    if user_input.is_empty() {
        return Err(ApiError::Validation("Input text is required".to_string()));
    }

    let language = match input.language.as_deref() {
        Some(s) => Language::from_str(s).ok_or_else(unsupported_language)?,
        None => Language::English,
    };

    let raw = state.llm.generate_note(language, &user_input).await?;
    let (note, extraction) = parse::parse_generated_note(&raw)?;
    if extraction == Extraction::Fallback {
        tracing::debug!("structured note extracted from surrounding model output");
    }

    Ok(Json(GeneratedNote {
        title: note.title,
        content: note.content,
        tags: note.tags,
        original_input: user_input,
    }))
}
