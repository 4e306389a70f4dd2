//! Locates the report field on a card by label.

use intake_core::{CardField, FieldReference};

/// Spacing/capitalisation variants accepted when no field matches the
/// target label exactly.
const LABEL_KEYWORDS: &[&str] = &[
    "informe crewai",
    "informe crew ai",
    "crewai informe",
    "crew ai informe",
];

/// The card field the analysis summary is written into.
#[derive(Debug, Clone)]
pub struct FieldTarget {
    /// Exact label/name to match, tried before the keyword pass.
    pub label: String,
}

impl FieldTarget {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl Default for FieldTarget {
    fn default() -> Self {
        Self::new("Informe CrewAI")
    }
}

/// Find the target field: exact case-sensitive label/name match first,
/// then a case-insensitive keyword pass. Returns `None` when the card has
/// no matching field, which callers must treat as "cannot update".
pub fn locate_field(fields: &[CardField], target: &FieldTarget) -> Option<FieldReference> {
    for field in fields {
        let label = field.label.as_deref().unwrap_or("").trim();
        let name = field.name.trim();
        if (label == target.label || name == target.label)
            && let Some(id) = &field.id
        {
            return Some(FieldReference {
                field_id: id.clone(),
            });
        }
    }

    for field in fields {
        let label = field.label.as_deref().unwrap_or("").to_lowercase();
        let name = field.name.to_lowercase();
        for keyword in LABEL_KEYWORDS {
            if (label.contains(keyword) || name.contains(keyword))
                && let Some(id) = &field.id
            {
                return Some(FieldReference {
                    field_id: id.clone(),
                });
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labelled(id: &str, label: &str) -> CardField {
        CardField {
            id: Some(id.to_string()),
            label: Some(label.to_string()),
            field_type: Some("long_text".to_string()),
            name: label.to_string(),
            value: None,
        }
    }

    #[test]
    fn exact_label_match_wins_over_keyword_match() {
        let fields = [
            labelled("f1", "Informe CREW AI extra"),
            labelled("f2", "Informe CrewAI"),
        ];
        let found = locate_field(&fields, &FieldTarget::default()).unwrap();
        assert_eq!(found.field_id, "f2");
    }

    #[test]
    fn keyword_pass_handles_spacing_variants() {
        let fields = [labelled("f1", "X"), labelled("f9", "INFORME CREW AI")];
        let found = locate_field(&fields, &FieldTarget::default()).unwrap();
        assert_eq!(found.field_id, "f9");
    }

    #[test]
    fn no_match_is_none() {
        let fields = [labelled("f1", "Observações"), labelled("f2", "Status")];
        assert!(locate_field(&fields, &FieldTarget::default()).is_none());
    }

    #[test]
    fn custom_target_label_is_respected() {
        let fields = [labelled("f3", "Resumo da Análise")];
        let target = FieldTarget::new("Resumo da Análise");
        assert_eq!(
            locate_field(&fields, &target).unwrap().field_id,
            "f3"
        );
    }

    #[test]
    fn field_without_id_cannot_be_targeted() {
        let mut field = labelled("", "Informe CrewAI");
        field.id = None;
        assert!(locate_field(&[field], &FieldTarget::default()).is_none());
    }
}
