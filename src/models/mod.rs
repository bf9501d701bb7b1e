//! Data models for the MindWell application.
//!
//! Field names serialize in camelCase to match the web client's TypeScript interfaces.

mod assessment;
mod chat;
mod journal;
mod mood;
mod user;

pub use assessment::*;
pub use chat::*;
pub use journal::*;
pub use mood::*;
pub use user::*;
