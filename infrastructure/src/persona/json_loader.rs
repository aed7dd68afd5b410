//! Persona file loader
//!
//! Reads the keyed persona layout written by the persona form:
//!
//! ```json
//! {
//!   "Persona 1": { "Name": "Emily", "Age": "25-34", "Hobbies": ["Reading"], ... },
//!   "Persona 2": { ... }
//! }
//! ```

use panel_domain::{ParticipantSpec, Persona};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur while loading personas
#[derive(Error, Debug)]
pub enum PersonaLoadError {
    #[error("Failed to read persona file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid persona JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("No usable persona in {0}")]
    Empty(PathBuf),
}

/// Loads [`Persona`]s from a JSON file
pub struct JsonPersonaLoader;

impl JsonPersonaLoader {
    /// Load personas in slot order (`Persona 1`, `Persona 2`, ..., `Persona 10`).
    ///
    /// Entries without a name are skipped with a warning.
    pub fn load(path: &Path) -> Result<Vec<Persona>, PersonaLoadError> {
        let raw = std::fs::read_to_string(path).map_err(|source| PersonaLoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let personas = Self::parse(&raw).map_err(|source| PersonaLoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if personas.is_empty() {
            return Err(PersonaLoadError::Empty(path.to_path_buf()));
        }
        debug!("Loaded {} personas from {}", personas.len(), path.display());
        Ok(personas)
    }

    /// Load personas and turn them into participants with the given quota
    pub fn load_participants(
        path: &Path,
        max_turns: u32,
    ) -> Result<Vec<ParticipantSpec>, PersonaLoadError> {
        Ok(Self::load(path)?
            .iter()
            .map(|p| p.to_participant_spec(max_turns))
            .collect())
    }

    /// Parse the keyed layout from a JSON string
    pub fn parse(raw: &str) -> Result<Vec<Persona>, serde_json::Error> {
        let slots: BTreeMap<String, Persona> = serde_json::from_str(raw)?;

        let mut slots: Vec<(String, Persona)> = slots.into_iter().collect();
        slots.sort_by(|(a, _), (b, _)| slot_order(a).cmp(&slot_order(b)).then_with(|| a.cmp(b)));

        Ok(slots
            .into_iter()
            .filter_map(|(key, persona)| {
                if persona.is_complete() {
                    Some(persona)
                } else {
                    warn!("Skipping persona '{}' without a name", key);
                    None
                }
            })
            .collect())
    }
}

/// Numeric suffix of a slot key; unnumbered keys sort last
fn slot_order(key: &str) -> u32 {
    key.rsplit(' ')
        .next()
        .and_then(|n| n.parse().ok())
        .unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERSONAS: &str = r#"{
        "Persona 10": {"Name": "Zoe", "Occupation": "Nurse"},
        "Persona 2": {"Name": "Michael", "Age": "35-44", "Hobbies": ["Cycling", "Cooking"]},
        "Persona 1": {"Name": "Emily", "Marital Status": "Single", "Backstory": "Loves thrift stores"},
        "Persona 3": {"Name": "  ", "Occupation": "Teacher"}
    }"#;

    #[test]
    fn test_parse_orders_slots_numerically() {
        let personas = JsonPersonaLoader::parse(PERSONAS).unwrap();
        let names: Vec<&str> = personas.iter().map(|p| p.name.as_str()).collect();
        // Unnamed "Persona 3" is skipped
        assert_eq!(names, vec!["Emily", "Michael", "Zoe"]);
        assert_eq!(personas[0].marital_status.as_deref(), Some("Single"));
        assert_eq!(personas[1].hobbies, vec!["Cycling", "Cooking"]);
    }

    #[test]
    fn test_load_participants_uses_quota() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("personas.json");
        std::fs::write(&path, PERSONAS).unwrap();

        let specs = JsonPersonaLoader::load_participants(&path, 4).unwrap();

        assert_eq!(specs.len(), 3);
        assert!(specs.iter().all(|s| s.max_turns == 4));
        assert_eq!(specs[2].display_name, "Zoe");
        assert_eq!(specs[2].role, "Nurse");
        assert!(specs[0].prompt_template.contains("Loves thrift stores"));
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("missing.json");
        assert!(matches!(
            JsonPersonaLoader::load(&missing),
            Err(PersonaLoadError::Read { .. })
        ));

        let invalid = dir.path().join("invalid.json");
        std::fs::write(&invalid, "[1, 2]").unwrap();
        assert!(matches!(
            JsonPersonaLoader::load(&invalid),
            Err(PersonaLoadError::Parse { .. })
        ));

        let empty = dir.path().join("empty.json");
        std::fs::write(&empty, "{}").unwrap();
        assert!(matches!(
            JsonPersonaLoader::load(&empty),
            Err(PersonaLoadError::Empty(_))
        ));
    }
}
