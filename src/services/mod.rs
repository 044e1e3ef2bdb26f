pub mod telemetry;
pub mod workspaces;
