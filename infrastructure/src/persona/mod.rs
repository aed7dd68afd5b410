//! Persona file adapters

mod json_loader;

pub use json_loader::{JsonPersonaLoader, PersonaLoadError};
