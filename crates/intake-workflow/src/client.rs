//! GraphQL client for the workflow tool's card API.

use std::time::Duration;

use async_trait::async_trait;
use intake_core::CardField;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::WorkflowError;

/// Per-request timeout; the workflow API is interactive, not batch.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const CARD_FIELDS_QUERY: &str = "\
query GetCardFields($cardId: ID!) {
  card(id: $cardId) {
    id
    fields {
      field { id label type }
      name
      value
    }
  }
}";

const UPDATE_FIELD_MUTATION: &str = "\
mutation UpdateCardField($cardId: ID!, $fieldId: ID!, $newValue: String!) {
  updateCardField(input: {card_id: $cardId, field_id: $fieldId, new_value: $newValue}) {
    card { id title }
  }
}";

/// Card operations the pipeline needs from the workflow tool.
#[async_trait]
pub trait CardGateway: Send + Sync {
    /// Fetch the card's field list (definition plus value, per field).
    async fn card_fields(&self, card_id: &str) -> Result<Vec<CardField>, WorkflowError>;

    /// Write `new_value` into a field; returns the card id echoed by the
    /// mutation response.
    async fn update_card_field(
        &self,
        card_id: &str,
        field_id: &str,
        new_value: &str,
    ) -> Result<String, WorkflowError>;
}

/// Bearer-token GraphQL client for the workflow API.
///
/// Requests are built with GraphQL variables, never interpolated into the
/// query text, so field content with quotes or newlines travels safely.
pub struct WorkflowClient {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<Value>>,
}

impl WorkflowClient {
    pub fn new(endpoint: String, token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            token,
        }
    }

    async fn execute(&self, query: &'static str, variables: Value) -> Result<Value, WorkflowError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .timeout(REQUEST_TIMEOUT)
            .json(&GraphQlRequest { query, variables })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(WorkflowError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let body: GraphQlResponse = resp.json().await?;
        if let Some(errors) = body.errors
            && !errors.is_empty()
        {
            return Err(WorkflowError::GraphQl(Value::Array(errors).to_string()));
        }
        Ok(body.data.unwrap_or(Value::Null))
    }
}

#[async_trait]
impl CardGateway for WorkflowClient {
    async fn card_fields(&self, card_id: &str) -> Result<Vec<CardField>, WorkflowError> {
        let data = self
            .execute(CARD_FIELDS_QUERY, json!({ "cardId": card_id }))
            .await?;
        card_fields_from_data(card_id, data)
    }

    async fn update_card_field(
        &self,
        card_id: &str,
        field_id: &str,
        new_value: &str,
    ) -> Result<String, WorkflowError> {
        let data = self
            .execute(
                UPDATE_FIELD_MUTATION,
                json!({ "cardId": card_id, "fieldId": field_id, "newValue": new_value }),
            )
            .await?;
        echoed_card_id(card_id, data)
    }
}

/// Extract the flattened field list from a `GetCardFields` response.
fn card_fields_from_data(card_id: &str, data: Value) -> Result<Vec<CardField>, WorkflowError> {
    #[derive(Deserialize)]
    struct Data {
        card: Option<Card>,
    }
    #[derive(Deserialize)]
    struct Card {
        #[serde(default)]
        fields: Vec<FieldEntry>,
    }
    #[derive(Deserialize)]
    struct FieldEntry {
        #[serde(default)]
        field: Option<FieldDef>,
        name: String,
        #[serde(default)]
        value: Option<String>,
    }
    #[derive(Deserialize, Default)]
    struct FieldDef {
        id: Option<String>,
        label: Option<String>,
        #[serde(rename = "type")]
        field_type: Option<String>,
    }

    let parsed: Data = serde_json::from_value(data)?;
    let card = parsed
        .card
        .ok_or_else(|| WorkflowError::CardNotFound(card_id.to_string()))?;

    Ok(card
        .fields
        .into_iter()
        .map(|entry| {
            let def = entry.field.unwrap_or_default();
            CardField {
                id: def.id,
                label: def.label,
                field_type: def.field_type,
                name: entry.name,
                value: entry.value,
            }
        })
        .collect())
}

/// Extract the echoed card id from an `UpdateCardField` response.
fn echoed_card_id(card_id: &str, data: Value) -> Result<String, WorkflowError> {
    data.pointer("/updateCardField/card/id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| WorkflowError::UpdateNotConfirmed(card_id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_card_field_list() {
        let data = json!({
            "card": {
                "id": "42",
                "fields": [
                    {
                        "field": { "id": "anexos", "label": "Anexos", "type": "attachment" },
                        "name": "Anexos",
                        "value": "[\"https://files/contrato.pdf\"]"
                    },
                    { "field": null, "name": "Observações", "value": null }
                ]
            }
        });

        let fields = card_fields_from_data("42", data).unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].id.as_deref(), Some("anexos"));
        assert_eq!(fields[0].field_type.as_deref(), Some("attachment"));
        assert_eq!(fields[1].name, "Observações");
        assert!(fields[1].id.is_none());
    }

    #[test]
    fn missing_card_is_card_not_found() {
        let err = card_fields_from_data("42", json!({ "card": null })).unwrap_err();
        assert!(matches!(err, WorkflowError::CardNotFound(id) if id == "42"));
    }

    #[test]
    fn update_requires_card_echo() {
        let data = json!({ "updateCardField": { "card": { "id": "42", "title": "Case 42" } } });
        assert_eq!(echoed_card_id("42", data).unwrap(), "42");

        let err = echoed_card_id("42", json!({ "updateCardField": {} })).unwrap_err();
        assert!(matches!(err, WorkflowError::UpdateNotConfirmed(_)));
    }

    #[test]
    fn mutation_value_travels_as_variable() {
        // Quotes and newlines in the value never touch the query text.
        let body = serde_json::to_value(GraphQlRequest {
            query: UPDATE_FIELD_MUTATION,
            variables: json!({ "cardId": "42", "fieldId": "f1", "newValue": "line one\n\"quoted\"" }),
        })
        .unwrap();

        assert_eq!(body["variables"]["newValue"], "line one\n\"quoted\"");
        assert!(body["query"].as_str().unwrap().contains("$newValue"));
        assert!(!body["query"].as_str().unwrap().contains("line one"));
    }
}
