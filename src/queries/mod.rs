pub mod documents;
pub mod event_logs;
pub mod prompt_history;
pub mod users;
pub mod workspace_users;
pub mod workspaces;
