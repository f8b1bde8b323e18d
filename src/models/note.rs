use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A user note.
///
/// Notes are freestanding: no folders, no links, no owner. Tags are an
/// ordered list supplied by the caller (not deduplicated), persisted in an
/// encoded text column and always exposed to the API as a plain list.
/// `event_date` and `event_time` are optional scheduling hints stored
/// verbatim; they are not validated against calendar rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// `YYYY-MM-DD` by convention.
    pub event_date: Option<String>,
    /// `HH:MM` or similar, free-form.
    pub event_time: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a note.
///
/// `title` and `content` are `Option` so that a missing key reaches the
/// handler as a validation failure (400) instead of a body-deserialization
/// rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNoteInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub event_date: Option<String>,
    pub event_time: Option<String>,
}

/// A tri-state field for partial updates: distinguishes a key that was not
/// supplied from one explicitly set to `null`.
///
/// Deserializing a present key yields `Null` or `Value`; `#[serde(default)]`
/// on the containing field keeps an absent key at `Missing`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Patch<T> {
    #[default]
    Missing,
    Null,
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Patch::Missing)
    }

    /// Collapse into the effective value, falling back to `existing` when
    /// the field was not supplied. `Null` clears to `None`.
    pub fn resolve(self, existing: Option<T>) -> Option<T> {
        match self {
            Patch::Missing => existing,
            Patch::Null => None,
            Patch::Value(v) => Some(v),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        })
    }
}

/// Input for updating a note. All fields are optional for partial updates.
///
/// `title` and `content` can be replaced but never cleared; the tri-state
/// fields can also be cleared by sending an explicit `null` (or, for tags,
/// an empty list).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNoteInput {
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(default)]
    pub tags: Patch<Vec<String>>,
    #[serde(default)]
    pub event_date: Patch<String>,
    #[serde(default)]
    pub event_time: Patch<String>,
}

/// Target languages accepted by the translate and generate endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Chinese,
    English,
    Japanese,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chinese => "Chinese",
            Self::English => "English",
            Self::Japanese => "Japanese",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Chinese" => Some(Self::Chinese),
            "English" => Some(Self::English),
            "Japanese" => Some(Self::Japanese),
            _ => None,
        }
    }
}

/// Input for `POST /notes/{id}/translate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateNoteInput {
    pub language: Option<String>,
}

/// Response for a translated note. The stored note is left untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatedNote {
    pub id: i64,
    pub title: String,
    pub content: String,
}

/// Input for `POST /notes/generate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateNoteInput {
    pub input: Option<String>,
    /// Defaults to English when absent.
    pub language: Option<String>,
}

/// A note proposed by the completion service. Not persisted; the client
/// issues a separate create call if it wants to keep it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedNote {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub original_input: String,
}
