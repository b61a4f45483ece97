//! Local project files: app.json and .vscode/launch.json

pub mod launch;
pub mod lock;
pub mod manifest;

pub use launch::{Environment, EnvironmentConfig, list_environments};
pub use lock::ProjectLock;
pub use manifest::{AppVersion, IncrementKind, Manifest, bump_manifest, manifest_exists, read_manifest};
