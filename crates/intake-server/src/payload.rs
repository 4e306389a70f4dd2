//! Strict decode types for inbound webhook bodies.
//!
//! The decode fails closed: a body that does not carry `data.card.id`
//! never reaches the pipeline. Unknown extra fields are tolerated — the
//! workflow tool decorates its events freely.

use serde::{Deserialize, Deserializer};

/// The workflow tool's card event envelope.
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    pub data: EventData,
}

#[derive(Debug, Deserialize)]
pub struct EventData {
    pub card: CardRef,
    #[serde(default)]
    pub action: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CardRef {
    /// Delivered sometimes as a JSON number, sometimes as a string.
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub pipe: Option<PipeRef>,
}

#[derive(Debug, Deserialize)]
pub struct PipeRef {
    #[serde(default, deserialize_with = "opt_id_string")]
    pub id: Option<String>,
}

impl WebhookPayload {
    pub fn pipe_id(&self) -> Option<String> {
        self.data.card.pipe.as_ref().and_then(|pipe| pipe.id.clone())
    }
}

/// Downstream notification that a report row landed in the registry.
#[derive(Debug, Deserialize)]
pub struct ReportNotification {
    #[serde(rename = "type")]
    pub kind: String,
    pub table: String,
    #[serde(default)]
    pub record: Option<ReportRecord>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportRecord {
    #[serde(default)]
    pub case_id: Option<String>,
    #[serde(default)]
    pub report: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(i64),
        Text(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Num(n) => n.to_string(),
        Raw::Text(s) => s,
    })
}

fn opt_id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(i64),
        Text(String),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Num(n) => n.to_string(),
        Raw::Text(s) => s,
    }))
}
