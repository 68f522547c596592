//! Shared test utilities, mocks, and fixtures for Bizflow crates.

pub mod fixtures;
mod mail;
mod store;

pub use mail::RecordingEmailSender;
pub use store::{MemoryStore, MemoryTaskCreator};
