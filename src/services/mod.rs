//! Application services.
//!
//! Shared logic that sits between the HTTP handlers and the database:
//! speech synthesis, backup archives, and deck export.

pub mod backup;
pub mod export;
pub mod tts;
