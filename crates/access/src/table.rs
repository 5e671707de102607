//! The fixed action → required-consent-types table.

use platform_core::model::{Action, ConsentType};

/// Required consent types for `action`. An action absent from the cases
/// below (none, currently) requires no consent.
pub fn required_consents(action: Action) -> &'static [ConsentType] {
    match action {
        Action::ReadGenomicData => &[ConsentType::GenomicAnalysis],
        Action::AnalyzeVariants => &[ConsentType::GenomicAnalysis],
        Action::ShareData => &[ConsentType::DataSharing],
        Action::GenerateReports => &[ConsentType::GenomicAnalysis],
        Action::ExecuteTheory => &[
            ConsentType::GenomicAnalysis,
            ConsentType::ResearchParticipation,
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execute_theory_requires_two_consent_types() {
        assert_eq!(
            required_consents(Action::ExecuteTheory),
            &[ConsentType::GenomicAnalysis, ConsentType::ResearchParticipation]
        );
    }
}
