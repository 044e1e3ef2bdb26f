use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::documents::Document;

/// Prompt used when a workspace has no explicit system prompt. Prompt-change
/// tracking treats this text as "unset": switching to or from it is not an
/// archivable edit.
pub const DEFAULT_SYSTEM_PROMPT: &str = "Given the following conversation, relevant context, and a follow up question, reply with an answer to the current question the user is asking. Return only your response to the question given the above information following the users instructions as needed.";

/// Operating mode of a workspace's assistant: free conversation or
/// retrieval-constrained answers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ChatMode {
    #[default]
    Chat,
    Query,
}

impl ChatMode {
    /// Parses a raw string, silently falling back to `Chat`.
    pub fn parse_or_default(raw: &str) -> Self {
        match raw {
            "chat" => ChatMode::Chat,
            "query" => ChatMode::Query,
            _ => ChatMode::Chat,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChatMode::Chat => "chat",
            ChatMode::Query => "query",
        }
    }
}

/// Retrieval strategy: plain similarity search or an extra re-ranking pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum VectorSearchMode {
    #[default]
    Default,
    Rerank,
}

impl VectorSearchMode {
    /// Parses a raw string, silently falling back to `Default`.
    pub fn parse_or_default(raw: &str) -> Self {
        match raw {
            "default" => VectorSearchMode::Default,
            "rerank" => VectorSearchMode::Rerank,
            _ => VectorSearchMode::Default,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VectorSearchMode::Default => "default",
            VectorSearchMode::Rerank => "rerank",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub chat_provider: Option<String>,
    pub chat_model: Option<String>,
    pub chat_temperature: Option<f64>,
    pub chat_history: i64,
    pub system_prompt: Option<String>,
    pub similarity_threshold: f64,
    pub top_n: i64,
    pub chat_mode: ChatMode,
    pub agent_provider: Option<String>,
    pub agent_model: Option<String>,
    pub query_refusal_response: Option<String>,
    pub vector_search_mode: VectorSearchMode,
    pub created_at: DateTime<Utc>,
    pub last_updated_at: DateTime<Utc>,
}

/// Fully-resolved column values for a workspace INSERT. Unspecified settings
/// land on their documented defaults here, not in scattered SQL.
#[derive(Debug, Clone)]
pub struct NewWorkspace {
    pub name: String,
    pub slug: String,
    pub chat_provider: Option<String>,
    pub chat_model: Option<String>,
    pub chat_temperature: Option<f64>,
    pub chat_history: i64,
    pub system_prompt: Option<String>,
    pub similarity_threshold: f64,
    pub top_n: i64,
    pub chat_mode: ChatMode,
    pub agent_provider: Option<String>,
    pub agent_model: Option<String>,
    pub query_refusal_response: Option<String>,
    pub vector_search_mode: VectorSearchMode,
}

impl NewWorkspace {
    /// Resolves a validated change-set into concrete insert values,
    /// defaulting every untouched column.
    pub fn from_update(name: String, slug: String, update: WorkspaceUpdate) -> Self {
        Self {
            name: update.name.unwrap_or(name),
            slug,
            chat_provider: update.chat_provider.flatten(),
            chat_model: update.chat_model.flatten(),
            chat_temperature: update.chat_temperature.flatten(),
            chat_history: update.chat_history.unwrap_or(20),
            system_prompt: update.system_prompt.flatten(),
            similarity_threshold: update.similarity_threshold.unwrap_or(0.25),
            top_n: update.top_n.unwrap_or(4),
            chat_mode: update.chat_mode.unwrap_or_default(),
            agent_provider: update.agent_provider.flatten(),
            agent_model: update.agent_model.flatten(),
            query_refusal_response: update.query_refusal_response.flatten(),
            vector_search_mode: update.vector_search_mode.unwrap_or_default(),
        }
    }
}

/// Validated change-set produced by the field validation table.
///
/// Outer `None` means "field untouched"; for nullable columns the inner
/// `Option` distinguishes "set to NULL" (`Some(None)`) from a new value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkspaceUpdate {
    pub name: Option<String>,
    pub chat_temperature: Option<Option<f64>>,
    pub chat_history: Option<i64>,
    pub system_prompt: Option<Option<String>>,
    pub similarity_threshold: Option<f64>,
    pub chat_provider: Option<Option<String>>,
    pub chat_model: Option<Option<String>>,
    pub top_n: Option<i64>,
    pub chat_mode: Option<ChatMode>,
    pub agent_provider: Option<Option<String>>,
    pub agent_model: Option<Option<String>>,
    pub query_refusal_response: Option<Option<String>>,
    pub vector_search_mode: Option<VectorSearchMode>,
}

impl WorkspaceUpdate {
    /// True when no whitelisted field survived validation.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.chat_temperature.is_none()
            && self.chat_history.is_none()
            && self.system_prompt.is_none()
            && self.similarity_threshold.is_none()
            && self.chat_provider.is_none()
            && self.chat_model.is_none()
            && self.top_n.is_none()
            && self.chat_mode.is_none()
            && self.agent_provider.is_none()
            && self.agent_model.is_none()
            && self.query_refusal_response.is_none()
            && self.vector_search_mode.is_none()
    }
}

/// Result of an update call: the row as stored, plus the informational
/// notice for the nothing-to-do case ("No valid fields to update!").
#[derive(Debug, Clone)]
pub struct WorkspaceUpdateOutcome {
    pub workspace: Workspace,
    pub message: Option<&'static str>,
}

/// A workspace hydrated with its documents, as returned by member-scoped reads.
#[derive(Debug, Clone, Serialize)]
pub struct WorkspaceWithDocuments {
    #[serde(flatten)]
    pub workspace: Workspace,
    pub documents: Vec<Document>,
}

/// Lookup clause for member-scoped workspace reads.
#[derive(Debug, Clone)]
pub enum WorkspaceFilter {
    Id(i64),
    Slug(String),
}

/// Caller-selectable ordering for workspace listings. No order means
/// storage (insertion) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WorkspaceOrder {
    Name,
    CreatedAt,
    LastUpdatedAt,
}

impl WorkspaceOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            WorkspaceOrder::Name => "name ASC",
            WorkspaceOrder::CreatedAt => "created_at ASC",
            WorkspaceOrder::LastUpdatedAt => "last_updated_at DESC",
        }
    }
}
