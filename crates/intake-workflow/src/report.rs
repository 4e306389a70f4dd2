//! Writes the analysis summary back into the card's report field.

use tracing::{info, warn};

use crate::client::CardGateway;
use crate::error::WorkflowError;
use crate::fields::{FieldTarget, locate_field};

/// Resolve the report field on `card_id` and write `content` into it.
///
/// The field is looked up fresh on every call. Success requires the
/// mutation response to echo the card id back; no retry at this layer —
/// retry policy, if any, belongs to the caller.
pub async fn publish_report(
    gateway: &dyn CardGateway,
    target: &FieldTarget,
    card_id: &str,
    content: &str,
) -> Result<(), WorkflowError> {
    let fields = gateway.card_fields(card_id).await?;
    let Some(field) = locate_field(&fields, target) else {
        warn!(card_id = %card_id, label = %target.label, "report field not found on card");
        return Err(WorkflowError::FieldNotFound(card_id.to_string()));
    };

    let echoed = gateway
        .update_card_field(card_id, &field.field_id, content)
        .await?;
    if echoed != card_id {
        return Err(WorkflowError::UpdateNotConfirmed(card_id.to_string()));
    }

    info!(card_id = %card_id, field_id = %field.field_id, "report field updated");
    Ok(())
}
