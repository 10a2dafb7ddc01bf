//! Wire format for the move service
//!
//! The client POSTs a [`MoveRequest`] as JSON and gets a [`MoveReply`] back.
//! Every reply field is optional on the wire; absent and `null` mean the
//! same thing.

use serde::{Deserialize, Deserializer, Serialize};

/// Which engine answers the move
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum EngineMode {
    /// Reinforcement-learning engine
    #[default]
    Default,
    /// Classical alpha-beta engine
    Traditional,
}

impl EngineMode {
    /// Path of the endpoint serving this engine
    pub const fn endpoint(self) -> &'static str {
        match self {
            EngineMode::Default => "/api/chess/make_move/",
            EngineMode::Traditional => "/api/chess/make_traditional_move/",
        }
    }
}

/// Move just played locally, and the position it produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    /// UCI notation
    #[serde(rename = "move")]
    pub mv: String,
    pub fen: String,
}

/// Service verdict on a submitted move
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveReply {
    /// Rejection reason; the submitted move must be taken back
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default, deserialize_with = "null_as_false")]
    pub game_over: bool,

    /// Result string (`"1-0"`, `"0-1"`, `"1/2-1/2"`) once the game is over
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,

    /// Opponent's answer
    #[serde(
        default,
        deserialize_with = "reply_move",
        skip_serializing_if = "Option::is_none"
    )]
    pub ai_move: Option<String>,

    /// Position after the opponent's answer, as the service sees it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_fen: Option<String>,
}

impl MoveReply {
    /// Rejection message, if any. An empty error string is not a rejection.
    pub fn rejection(&self) -> Option<&str> {
        self.error.as_deref().filter(|message| !message.is_empty())
    }

    pub fn result_text(&self) -> &str {
        self.result.as_deref().unwrap_or("*")
    }
}

fn null_as_false<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// The opponent's move arrives either as notation text or as a
/// `{from, to, promotion}` object; both become a single notation string.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireMove {
    Notation(String),
    Squares {
        from: String,
        to: String,
        #[serde(default)]
        promotion: Option<String>,
    },
}

fn reply_move<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let wire = Option::<WireMove>::deserialize(deserializer)?;
    Ok(wire.and_then(|mv| {
        let notation = match mv {
            WireMove::Notation(text) => text,
            WireMove::Squares {
                from,
                to,
                promotion,
            } => format!("{from}{to}{}", promotion.unwrap_or_default()),
        };
        Some(notation).filter(|text| !text.is_empty())
    }))
}
