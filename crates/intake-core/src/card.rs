//! Card field data as returned by the workflow API.

use serde::{Deserialize, Serialize};

/// One entry of a card's field list.
///
/// The workflow API nests the static field definition (`field { id label
/// type }`) inside each value entry; this struct flattens the pair. The
/// attachment resolver reads `name`/`value`, the field locator reads
/// `id`/`label`/`name`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardField {
    /// Field definition id, required for mutations.
    pub id: Option<String>,
    /// Human-facing label from the field definition.
    pub label: Option<String>,
    /// Field type name (`short_text`, `attachment`, ...).
    pub field_type: Option<String>,
    /// Per-card field name.
    pub name: String,
    /// Raw field value; attachment fields hold a JSON-encoded URL array.
    pub value: Option<String>,
}

/// A resolved reference to a card field, good for one mutation.
///
/// Never cached across invocations: the field is re-resolved on every
/// update so a re-created field cannot leave a stale id behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldReference {
    pub field_id: String,
}
