//! Statutory validation of takedown notices.
//!
//! Checks the legal elements a notice must carry under its governing
//! framework. Validation never blocks ticket creation: receipt must always
//! be acknowledged, so incompleteness is recorded as remediation flags on
//! the notice rather than a rejection.

use super::types::{
    Jurisdiction, LegalFramework, NoticeSubmission, StatutoryElement, ValidationOutcome,
};

/// Framework a notice defaults to when the claimant names none
///
/// Unknown jurisdictions take the WIPO-aligned baseline; this is a catch-all,
/// never an error.
pub fn default_framework(jurisdiction: Jurisdiction) -> LegalFramework {
    match jurisdiction {
        Jurisdiction::Us => LegalFramework::Dmca512,
        Jurisdiction::Eu => LegalFramework::DsaArt16,
        Jurisdiction::Uk => LegalFramework::Cdpa1988,
        Jurisdiction::Ca => LegalFramework::CaNotice,
        Jurisdiction::Au => LegalFramework::AuCopyright,
        Jurisdiction::Worldwide => LegalFramework::WipoGlobal,
    }
}

/// Validate a submission against its governing framework
pub fn validate(submission: &NoticeSubmission, framework: LegalFramework) -> ValidationOutcome {
    let missing = match framework {
        LegalFramework::Dmca512 => dmca_missing_elements(submission),
        LegalFramework::DsaArt16 => {
            // Article 16(2) requires a substantiated, good-faith explanation
            // on top of the shared identification core.
            let mut missing = core_missing_elements(submission);
            if !submission.good_faith_attestation {
                missing.push(StatutoryElement::GoodFaithAttestation);
            }
            missing
        }
        _ => core_missing_elements(submission),
    };

    ValidationOutcome {
        valid: missing.is_empty(),
        missing,
    }
}

/// The nine DMCA §512(c)(3) elements
///
/// A false or absent attestation counts as missing, the same as an empty
/// text field.
pub fn dmca_missing_elements(submission: &NoticeSubmission) -> Vec<StatutoryElement> {
    let mut missing = Vec::new();

    if submission.claimant_name.trim().is_empty() {
        missing.push(StatutoryElement::ClaimantName);
    }
    if submission.claimant_address.trim().is_empty() {
        missing.push(StatutoryElement::ClaimantAddress);
    }
    if submission.claimant_email.trim().is_empty() {
        missing.push(StatutoryElement::ClaimantEmail);
    }
    if submission.copyrighted_work.trim().is_empty() {
        missing.push(StatutoryElement::CopyrightedWork);
    }
    if submission.infringement_description.trim().is_empty() {
        missing.push(StatutoryElement::InfringementDescription);
    }
    if !submission.good_faith_attestation {
        missing.push(StatutoryElement::GoodFaithAttestation);
    }
    if !submission.accuracy_attestation {
        missing.push(StatutoryElement::AccuracyAttestation);
    }
    if !submission.perjury_attestation {
        missing.push(StatutoryElement::PerjuryAttestation);
    }
    if submission.signature.trim().is_empty() {
        missing.push(StatutoryElement::ElectronicSignature);
    }

    missing
}

/// Identification core shared by the non-DMCA frameworks
fn core_missing_elements(submission: &NoticeSubmission) -> Vec<StatutoryElement> {
    let mut missing = Vec::new();

    if submission.claimant_name.trim().is_empty() {
        missing.push(StatutoryElement::ClaimantName);
    }
    if submission.claimant_email.trim().is_empty() {
        missing.push(StatutoryElement::ClaimantEmail);
    }
    if submission.copyrighted_work.trim().is_empty() {
        missing.push(StatutoryElement::CopyrightedWork);
    }
    if submission.infringement_description.trim().is_empty() {
        missing.push(StatutoryElement::InfringementDescription);
    }
    if submission.signature.trim().is_empty() {
        missing.push(StatutoryElement::ElectronicSignature);
    }

    missing
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_submission() -> NoticeSubmission {
        NoticeSubmission {
            content_ref: "video-991".into(),
            content_type: "video".into(),
            artist_id: "artist-17".into(),
            claimant_name: "Acme Rights Management".into(),
            claimant_address: "1 Infinite Loop, Cupertino CA".into(),
            claimant_email: "legal@acme.example".into(),
            claimant_organization: Some("Acme".into()),
            copyrighted_work: "Song of the Quarter".into(),
            infringement_description: "Full track uploaded without license".into(),
            good_faith_attestation: true,
            accuracy_attestation: true,
            perjury_attestation: true,
            signature: "/s/ Jane Counsel".into(),
            jurisdiction: "US".into(),
            trust_level: None,
        }
    }

    #[test]
    fn test_framework_defaults_per_jurisdiction() {
        assert_eq!(default_framework(Jurisdiction::Us), LegalFramework::Dmca512);
        assert_eq!(default_framework(Jurisdiction::Eu), LegalFramework::DsaArt16);
        assert_eq!(default_framework(Jurisdiction::Uk), LegalFramework::Cdpa1988);
        assert_eq!(default_framework(Jurisdiction::Ca), LegalFramework::CaNotice);
        assert_eq!(default_framework(Jurisdiction::Au), LegalFramework::AuCopyright);
        assert_eq!(
            default_framework(Jurisdiction::from_code("KR")),
            LegalFramework::WipoGlobal
        );
    }

    #[test]
    fn test_empty_submission_misses_all_nine_dmca_elements() {
        let missing = dmca_missing_elements(&NoticeSubmission::default());
        assert_eq!(missing.len(), 9);
    }

    #[test]
    fn test_complete_submission_is_valid() {
        let outcome = validate(&complete_submission(), LegalFramework::Dmca512);
        assert!(outcome.valid);
        assert!(outcome.missing.is_empty());
    }

    #[test]
    fn test_false_attestation_counts_as_missing() {
        let mut submission = complete_submission();
        submission.perjury_attestation = false;

        let outcome = validate(&submission, LegalFramework::Dmca512);
        assert!(!outcome.valid);
        assert_eq!(outcome.missing, vec![StatutoryElement::PerjuryAttestation]);
    }

    #[test]
    fn test_dsa_requires_good_faith_on_top_of_core() {
        let mut submission = complete_submission();
        submission.good_faith_attestation = false;
        submission.claimant_address = String::new();

        // Address is a DMCA element, not part of the DSA core.
        let outcome = validate(&submission, LegalFramework::DsaArt16);
        assert_eq!(outcome.missing, vec![StatutoryElement::GoodFaithAttestation]);
    }

    #[test]
    fn test_wipo_core_subset() {
        let mut submission = complete_submission();
        submission.accuracy_attestation = false;
        submission.perjury_attestation = false;

        // Attestations are DMCA-specific; the baseline core still validates.
        let outcome = validate(&submission, LegalFramework::WipoGlobal);
        assert!(outcome.valid);
    }
}
