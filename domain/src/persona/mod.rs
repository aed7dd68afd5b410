//! Persona value object.
//!
//! A persona is the demographic profile behind a simulated participant.
//! Field names on the wire follow the persona form layout
//! (`"Name"`, `"Marital Status"`, ...).

use crate::participant::entities::{DEFAULT_MAX_TURNS, ParticipantSpec};
use crate::prompt::PanelPromptTemplate;
use serde::{Deserialize, Serialize};

/// Demographic profile of a simulated panel member (Value Object)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Persona {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Age", skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    #[serde(rename = "Gender", skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(rename = "Location", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(rename = "Education", skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    #[serde(rename = "Employment", skip_serializing_if = "Option::is_none")]
    pub employment: Option<String>,
    #[serde(rename = "Income", skip_serializing_if = "Option::is_none")]
    pub income: Option<String>,
    #[serde(rename = "Marital Status", skip_serializing_if = "Option::is_none")]
    pub marital_status: Option<String>,
    #[serde(rename = "Children", skip_serializing_if = "Option::is_none")]
    pub children: Option<String>,
    #[serde(rename = "Occupation", skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(rename = "Hobbies", skip_serializing_if = "Vec::is_empty")]
    pub hobbies: Vec<String>,
    #[serde(rename = "Backstory", skip_serializing_if = "Option::is_none")]
    pub backstory: Option<String>,
}

impl Persona {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// A persona without a name cannot take part in a panel
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// Role label used in prompts; falls back to a generic label.
    pub fn role(&self) -> &str {
        self.occupation
            .as_deref()
            .filter(|o| !o.trim().is_empty())
            .unwrap_or("panel participant")
    }

    /// Labelled attribute lines, skipping empty attributes
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        let optional = [
            ("Age", &self.age),
            ("Gender", &self.gender),
            ("Location", &self.location),
            ("Education", &self.education),
            ("Employment", &self.employment),
            ("Income", &self.income),
            ("Marital status", &self.marital_status),
            ("Children", &self.children),
            ("Occupation", &self.occupation),
        ];

        let mut attrs: Vec<(&'static str, String)> = optional
            .into_iter()
            .filter_map(|(label, value)| {
                value
                    .as_deref()
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(|v| (label, v.to_string()))
            })
            .collect();

        if !self.hobbies.is_empty() {
            attrs.push(("Hobbies", self.hobbies.join(", ")));
        }
        if let Some(backstory) = self.backstory.as_deref().map(str::trim)
            && !backstory.is_empty()
        {
            attrs.push(("Background", backstory.to_string()));
        }
        attrs
    }

    /// Build the participant description used to register this persona
    pub fn to_participant_spec(&self, max_turns: u32) -> ParticipantSpec {
        ParticipantSpec::new(
            self.name.trim(),
            self.role(),
            PanelPromptTemplate::persona_prompt(self),
        )
        .with_max_turns(max_turns)
    }
}

impl From<&Persona> for ParticipantSpec {
    fn from(persona: &Persona) -> Self {
        persona.to_participant_spec(DEFAULT_MAX_TURNS)
    }
}
