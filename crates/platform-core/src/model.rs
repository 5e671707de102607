//! Closed enums shared across components, with stable wire encodings.

use serde::{Deserialize, Serialize};

/// Consent categories a `ConsentForm` may grant. Extension requires a code
/// release — this is not meant to be configurable at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsentType {
    GenomicAnalysis,
    DataSharing,
    ResearchParticipation,
    CommercialUse,
    LongTermStorage,
}

impl ConsentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsentType::GenomicAnalysis => "GENOMIC_ANALYSIS",
            ConsentType::DataSharing => "DATA_SHARING",
            ConsentType::ResearchParticipation => "RESEARCH_PARTICIPATION",
            ConsentType::CommercialUse => "COMMERCIAL_USE",
            ConsentType::LongTermStorage => "LONG_TERM_STORAGE",
        }
    }
}

impl std::fmt::Display for ConsentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Actions gated by consent. Each maps to a fixed set of required
/// `ConsentType`s — see `access::REQUIRED_CONSENTS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    ReadGenomicData,
    AnalyzeVariants,
    ShareData,
    GenerateReports,
    ExecuteTheory,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::ReadGenomicData => "READ_GENOMIC_DATA",
            Action::AnalyzeVariants => "ANALYZE_VARIANTS",
            Action::ShareData => "SHARE_DATA",
            Action::GenerateReports => "GENERATE_REPORTS",
            Action::ExecuteTheory => "EXECUTE_THEORY",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ledger entry classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerEntryType {
    ConsentGranted,
    ConsentWithdrawn,
    DataAccess,
    TheoryExecution,
    EvidenceAdded,
    GenomicAnalysis,
    ReportGenerated,
}

impl LedgerEntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerEntryType::ConsentGranted => "consent_granted",
            LedgerEntryType::ConsentWithdrawn => "consent_withdrawn",
            LedgerEntryType::DataAccess => "data_access",
            LedgerEntryType::TheoryExecution => "theory_execution",
            LedgerEntryType::EvidenceAdded => "evidence_added",
            LedgerEntryType::GenomicAnalysis => "genomic_analysis",
            LedgerEntryType::ReportGenerated => "report_generated",
        }
    }
}

impl std::fmt::Display for LedgerEntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consent_type_wire_names_are_screaming_snake() {
        assert_eq!(ConsentType::GenomicAnalysis.as_str(), "GENOMIC_ANALYSIS");
        assert_eq!(ConsentType::LongTermStorage.as_str(), "LONG_TERM_STORAGE");
    }

    #[test]
    fn action_wire_names_match_spec() {
        assert_eq!(Action::ExecuteTheory.as_str(), "EXECUTE_THEORY");
    }
}
