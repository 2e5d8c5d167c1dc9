//! Chat log, reply language and typeahead suggestions.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::models::{NlpAnalysis, QueryOutcome, QueryReply};
use crate::render::{
    escape_html, render_care_calendar, render_markdown, render_plant_cards,
};

pub const NOTHING_FOUND: &str = "🤔 Sorry, I couldn't find anything matching your request.";
pub const CONNECTION_ERROR: &str = "⚠️ Sorry, there was a connection error. Please try again.";

pub const SAMPLE_QUERIES: [&str; 7] = [
    "Summer plants for beginners",
    "How to care for roses",
    "Indoor plants low light",
    "What grows in monsoon?",
    "Best plants for tropical climate",
    "Native plants Mumbai",
    "Tulsi care instructions",
];

/// Sample queries containing `input`, ignoring case. Blank input suggests nothing.
pub fn suggest(input: &str) -> Vec<&'static str> {
    let needle = input.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    SAMPLE_QUERIES
        .iter()
        .copied()
        .filter(|q| q.to_lowercase().contains(&needle))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
    Es,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
            Language::Es => "es",
        }
    }

    /// en -> hi -> es -> en
    pub fn next(&self) -> Self {
        match self {
            Language::En => Language::Hi,
            Language::Hi => Language::Es,
            Language::Es => Language::En,
        }
    }
}

impl std::str::FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "hi" => Ok(Language::Hi),
            "es" => Ok(Language::Es),
            other => Err(Error::InvalidOption(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn class(&self) -> &'static str {
        match self {
            Sender::User => "message user",
            Sender::Bot => "message bot",
        }
    }
}

/// One entry of the chat log. `html` is ready-to-insert markup.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub sender: Sender,
    pub html: String,
    pub analysis: Option<NlpAnalysis>,
}

impl ChatMessage {
    /// User text is shown verbatim
    pub fn user(text: &str) -> Self {
        Self {
            sender: Sender::User,
            html: escape_html(text),
            analysis: None,
        }
    }

    pub fn bot(html: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            html: html.into(),
            analysis: None,
        }
    }

    pub fn with_analysis(mut self, analysis: Option<NlpAnalysis>) -> Self {
        self.analysis = analysis;
        self
    }

    /// Bot message for a classified `/query` answer
    pub fn from_reply(reply: &QueryReply) -> Self {
        match &reply.outcome {
            QueryOutcome::CareCalendar { plant_id, schedule } => {
                ChatMessage::bot(render_care_calendar(schedule, *plant_id))
            }
            QueryOutcome::Plants {
                plants,
                total_eco_impact,
                analysis,
            } => ChatMessage::bot(render_plant_cards(plants, *total_eco_impact))
                .with_analysis(analysis.clone()),
            QueryOutcome::Message {
                message,
                suggestions,
                analysis,
            } => {
                let mut html = render_markdown(message);
                if !suggestions.is_empty() {
                    html.push_str(r#"<div class="query-suggestions">"#);
                    for s in suggestions {
                        html.push_str(&format!(
                            r#"<span class="suggestion-chip">{}</span>"#,
                            escape_html(s)
                        ));
                    }
                    html.push_str("</div>");
                }
                ChatMessage::bot(html).with_analysis(analysis.clone())
            }
            QueryOutcome::Nothing => ChatMessage::bot(NOTHING_FOUND),
        }
    }

    pub fn backend_error(message: &str) -> Self {
        ChatMessage::bot(format!("❌ Error: {}", escape_html(message)))
    }

    pub fn connection_error() -> Self {
        ChatMessage::bot(CONNECTION_ERROR)
    }
}

/// Ordered, append-only
#[derive(Debug, Default, Clone)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Plant;

    #[test]
    fn test_suggest_case_insensitive() {
        assert_eq!(suggest("ROSE"), vec!["How to care for roses"]);
        assert_eq!(suggest("plants").len(), 4);
        assert!(suggest("").is_empty());
        assert!(suggest("cactus").is_empty());
    }

    #[test]
    fn test_language_cycle() {
        let lang = Language::default();
        assert_eq!(lang.next(), Language::Hi);
        assert_eq!(lang.next().next(), Language::Es);
        assert_eq!(lang.next().next().next(), Language::En);
        assert_eq!("HI".parse::<Language>().unwrap(), Language::Hi);
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn test_user_text_is_escaped() {
        let msg = ChatMessage::user("<b>roses</b>");
        assert_eq!(msg.html, "&lt;b&gt;roses&lt;/b&gt;");
        assert_eq!(msg.sender.class(), "message user");
    }

    #[test]
    fn test_reply_rendering() {
        let reply = QueryReply {
            outcome: QueryOutcome::Plants {
                plants: vec![Plant {
                    name: "Neem".into(),
                    ..Default::default()
                }],
                total_eco_impact: 0.0,
                analysis: None,
            },
            language: None,
        };
        assert!(ChatMessage::from_reply(&reply).html.contains("Neem"));

        let nothing = QueryReply {
            outcome: QueryOutcome::Nothing,
            language: None,
        };
        assert_eq!(ChatMessage::from_reply(&nothing).html, NOTHING_FOUND);
        assert_eq!(
            ChatMessage::backend_error("Search failed").html,
            "❌ Error: Search failed"
        );
    }
}
