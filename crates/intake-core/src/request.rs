//! The request body sent verbatim to the analysis service.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::document::TransferredDocument;

/// Everything the analysis service needs for one case.
///
/// Built once per webhook invocation and serialized verbatim; `documents`
/// is exactly the subsequence of attachments that completed all three
/// transfer steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub case_id: String,
    pub documents: Vec<TransferredDocument>,
    pub checklist_url: String,
    /// Serialized `YYYY-MM-DD`.
    pub current_date: NaiveDate,
    pub pipe_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentTag;

    #[test]
    fn request_wire_format() {
        let request = AnalysisRequest {
            case_id: "337366661".into(),
            documents: vec![TransferredDocument {
                name: "contrato_social.pdf".into(),
                file_url: "https://store/337366661/contrato_social.pdf".into(),
                tag: DocumentTag::SocialContract,
            }],
            checklist_url: "https://store/checklist/checklist.pdf".into(),
            current_date: NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(),
            pipe_id: Some("306294445".into()),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["case_id"], "337366661");
        assert_eq!(json["current_date"], "2026-08-07");
        assert_eq!(json["pipe_id"], "306294445");
        assert_eq!(json["documents"][0]["document_tag"], "social_contract");
    }

    #[test]
    fn absent_pipe_id_serializes_as_null() {
        let request = AnalysisRequest {
            case_id: "1".into(),
            documents: vec![],
            checklist_url: "https://store/checklist/checklist.pdf".into(),
            current_date: NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(),
            pipe_id: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert!(json["pipe_id"].is_null());
        assert_eq!(json["documents"].as_array().unwrap().len(), 0);
    }
}
