//! Prompt templates for the panel flow

use crate::conversation::config::ModeratorSpec;
use crate::participant::entities::Participant;
use crate::persona::Persona;

const BASE_NOTICE: &str = "You are part of a research panel to gather relevant information about a new product that our client is launching. We appreciate your collaboration.";

const NON_PERSONA_NOTICE: &str = " Do not show appreciation in your responses, say only what is necessary. If \"Thank you\" or \"You're welcome\" are said in the conversation, then say TERMINATE to indicate the conversation is finished and this is your last message.";

/// Roles that steer the panel instead of playing a persona
const STEERING_ROLES: &[&str] = &["manager", "researcher", "moderator"];

/// Templates for generating prompts for each panel role
///
/// Templates may use `{name}`, `{role}`, `{topic}` and (moderator only)
/// `{participants}` placeholders.
pub struct PanelPromptTemplate;

impl PanelPromptTemplate {
    /// Default system prompt for the moderator
    pub fn moderator_default() -> &'static str {
        r#"You are {name}, the moderator of a consumer focus group about: {topic}
You keep the conversation flowing between group members. Limit yourself to moderating the debate and do not express opinions as a participant.
Ask one question at a time and do not reply more than once before another group member speaks. You can answer group members' questions, but do not offer additional information and be as concise as possible.
Do not say thank you or the end. If there is nothing more to say, end the conversation by saying TERMINATE and avoid a greetings loop between participants.
The participants are: {participants}. Make sure that everyone speaks more than once."#
    }

    /// Default system prompt for a participant without a persona
    pub fn participant_default() -> &'static str {
        "You are {name}, {role}, taking part in a consumer focus group about: {topic}\nAnswer the moderator's questions with your own honest opinion."
    }

    /// Notice appended to every system prompt, depending on the role
    pub fn role_notice(role: &str) -> String {
        let steering = STEERING_ROLES
            .iter()
            .any(|r| r.eq_ignore_ascii_case(role.trim()));
        if steering {
            format!("{BASE_NOTICE}{NON_PERSONA_NOTICE}")
        } else {
            format!(
                "{BASE_NOTICE} Act as {role} when responding to queries, providing feedback, being asked for your personal opinion or participating in discussions."
            )
        }
    }

    /// Replace `{key}` placeholders in `template`
    pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
        vars.iter().fold(template.to_string(), |acc, (key, value)| {
            acc.replace(&format!("{{{key}}}"), value)
        })
    }

    /// Full system prompt for the moderator
    pub fn moderator_system(moderator: &ModeratorSpec, participants: &[&str], topic: &str) -> String {
        let participants = participants.join(", ");
        let body = Self::render(
            &moderator.prompt_template,
            &[
                ("name", moderator.display_name.as_str()),
                ("topic", topic),
                ("participants", participants.as_str()),
            ],
        );
        format!("{}\n\n{}", body.trim(), Self::role_notice("moderator"))
    }

    /// Moderator prompt for one turn, naming who answers next
    pub fn moderator_turn(system: &str, next_participant: &str) -> String {
        format!(
            "{system}\n\nYour next question is for {next_participant}. Address them by name and ask a single question."
        )
    }

    /// Full system prompt for a participant
    pub fn participant_system(participant: &Participant, topic: &str) -> String {
        let body = Self::render(
            participant.prompt_template(),
            &[
                ("name", participant.display_name()),
                ("role", participant.role()),
                ("topic", topic),
            ],
        );
        format!(
            "{}\n\n{}",
            body.trim(),
            Self::role_notice(participant.role())
        )
    }

    /// Participant prompt template describing a persona
    pub fn persona_prompt(persona: &Persona) -> String {
        let mut prompt = format!(
            "You are {}, a virtual focus group participant. You do not know anything about the product beyond what you are told.\n",
            persona.name.trim()
        );
        for (label, value) in persona.attributes() {
            prompt.push_str(&format!("{label}: {value}\n"));
        }
        prompt.push_str(
            "Give your own honest, personal opinion in your own voice and stay in character.",
        );
        prompt
    }

    /// System prompt for the summary step
    pub fn summary_system() -> String {
        let body = r#"You are an expert researcher in behavioural science tasked with summarising a research panel. Provide a structured summary of the key findings, including pain points, preferences, and suggestions for improvement, in this format:

```
Research Study: <<Title>>

Subjects:
<<Overview of the subjects and number, any other key information>>

Summary:
<<Summary of the study, include detailed analysis as an expert>>

Pain Points:
- <<One short paragraph per pain point, clear and prescriptive enough for the brand to act on>>

Suggestions/Actions:
- <<One short paragraph per recommendation, clear and prescriptive enough for the brand to act on>>
```"#;
        format!("{body}\n\n{}", Self::role_notice("researcher"))
    }

    /// User prompt carrying the participant-only transcript
    pub fn summary_prompt(participant_contents: &[&str]) -> String {
        format!(
            "Here is the transcript of the study ```{}```",
            participant_contents.join("\n>>>\n")
        )
    }
}
