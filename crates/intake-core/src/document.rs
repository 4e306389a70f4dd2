//! Attachment and document types, plus filename-based tag classification.

use serde::{Deserialize, Serialize};

/// A file reference detected inside a card's field values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub source_url: String,
}

/// Semantic category of an ingested document, derived from its filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentTag {
    SocialContract,
    ProofOfResidence,
    IdentityDocument,
    TaxReturn,
    RegistrationCertificate,
    PowerOfAttorney,
    BalanceSheet,
    RevenueReport,
    OtherDocument,
}

impl DocumentTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SocialContract => "social_contract",
            Self::ProofOfResidence => "proof_of_residence",
            Self::IdentityDocument => "identity_document",
            Self::TaxReturn => "tax_return",
            Self::RegistrationCertificate => "registration_certificate",
            Self::PowerOfAttorney => "power_of_attorney",
            Self::BalanceSheet => "balance_sheet",
            Self::RevenueReport => "revenue_report",
            Self::OtherDocument => "other_document",
        }
    }
}

/// Keyword table for tag classification, in match priority order.
///
/// Keywords are matched as case-insensitive substrings of the filename and
/// the first row with any hit wins. The onboarding documents this service
/// ingests carry Portuguese filenames, so the keywords do too.
const TAG_KEYWORDS: &[(DocumentTag, &[&str])] = &[
    (DocumentTag::SocialContract, &["contrato", "social", "estatuto"]),
    (
        DocumentTag::ProofOfResidence,
        &["comprovante", "residencia", "endereco"],
    ),
    (DocumentTag::IdentityDocument, &["rg", "identidade", "cnh"]),
    (DocumentTag::TaxReturn, &["declaracao", "imposto", "ir"]),
    (
        DocumentTag::RegistrationCertificate,
        &["certificado", "registro"],
    ),
    (DocumentTag::PowerOfAttorney, &["procuracao"]),
    (
        DocumentTag::BalanceSheet,
        &["balanco", "patrimonial", "demonstracao"],
    ),
    (DocumentTag::RevenueReport, &["faturamento", "receita"]),
];

/// Classify a filename into a [`DocumentTag`].
///
/// Pure and total: the same filename always yields the same tag, and a
/// filename matching no keyword yields [`DocumentTag::OtherDocument`].
pub fn classify_filename(filename: &str) -> DocumentTag {
    let lower = filename.to_lowercase();
    for (tag, keywords) in TAG_KEYWORDS {
        if keywords.iter().any(|keyword| lower.contains(keyword)) {
            return *tag;
        }
    }
    DocumentTag::OtherDocument
}

/// A document that completed download, upload, and registration.
///
/// Serialized field names (`name`, `file_url`, `document_tag`) are the
/// wire format the analysis service expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferredDocument {
    pub name: String,
    pub file_url: String,
    #[serde(rename = "document_tag")]
    pub tag: DocumentTag,
}
