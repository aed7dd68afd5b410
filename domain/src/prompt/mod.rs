//! Prompt domain
//!
//! Templates for the moderator, participant and summary roles.

mod template;

pub use template::PanelPromptTemplate;
