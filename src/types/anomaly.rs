use std::collections::HashMap;
use serde::{Deserialize, Serialize};

/// Why the backend flagged a post. Unknown codes are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReasonCode {
    ShortTitle,
    DuplicateTitle,
    BotLikeBehavior,
    Other(String),
}

impl ReasonCode {
    pub fn as_code(&self) -> &str {
        match self {
            ReasonCode::ShortTitle => "short_title",
            ReasonCode::DuplicateTitle => "duplicate_title",
            ReasonCode::BotLikeBehavior => "bot_like_behavior",
            ReasonCode::Other(raw) => raw,
        }
    }

    /// Human-readable label; unrecognized codes display as-is.
    pub fn label(&self) -> &str {
        match self {
            ReasonCode::ShortTitle => "Short Title",
            ReasonCode::DuplicateTitle => "Duplicate Title",
            ReasonCode::BotLikeBehavior => "Bot-like Behavior",
            ReasonCode::Other(raw) => raw,
        }
    }

    pub fn icon(&self) -> ReasonIcon {
        match self {
            ReasonCode::ShortTitle => ReasonIcon {
                glyph: IconGlyph::FileText,
                tone: IconTone::Orange,
            },
            ReasonCode::DuplicateTitle => ReasonIcon {
                glyph: IconGlyph::AlertTriangle,
                tone: IconTone::Red,
            },
            ReasonCode::BotLikeBehavior => ReasonIcon {
                glyph: IconGlyph::AlertTriangle,
                tone: IconTone::Purple,
            },
            ReasonCode::Other(_) => ReasonIcon {
                glyph: IconGlyph::AlertTriangle,
                tone: IconTone::Gray,
            },
        }
    }
}

impl From<String> for ReasonCode {
    fn from(code: String) -> Self {
        match code.as_str() {
            "short_title" => ReasonCode::ShortTitle,
            "duplicate_title" => ReasonCode::DuplicateTitle,
            "bot_like_behavior" => ReasonCode::BotLikeBehavior,
            _ => ReasonCode::Other(code),
        }
    }
}

impl From<&str> for ReasonCode {
    fn from(code: &str) -> Self {
        ReasonCode::from(code.to_string())
    }
}

impl From<ReasonCode> for String {
    fn from(reason: ReasonCode) -> Self {
        match reason {
            ReasonCode::Other(raw) => raw,
            known => known.as_code().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconGlyph {
    FileText,
    AlertTriangle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconTone {
    Orange,
    Red,
    Purple,
    Gray,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasonIcon {
    pub glyph: IconGlyph,
    pub tone: IconTone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anomaly {
    pub user_id: i64,
    pub id: i64,
    pub title: String,
    pub reason: ReasonCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side aggregate counts. Keys stay snake_case on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyBreakdown {
    #[serde(default)]
    pub total_anomalies: u64,
    #[serde(default)]
    pub by_reason: HashMap<String, u64>,
    #[serde(default)]
    pub by_user: HashMap<String, u64>,
    #[serde(default)]
    pub unique_users_affected: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomaliesResponse {
    pub anomalies: Vec<Anomaly>,
    pub total: u64,
    #[serde(default)]
    pub summary: AnomalyBreakdown,
}
