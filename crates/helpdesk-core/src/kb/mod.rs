//! Knowledgebase document model.

pub mod document;

pub use document::{KnowledgebaseDocument, WELCOME_CONTENT, byte_index_at_char};
