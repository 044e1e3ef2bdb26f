pub mod documents;
pub mod events;
pub mod requests;
pub mod users;
pub mod workspace_users;
pub mod workspaces;
