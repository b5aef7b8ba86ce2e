//! Creator lifecycle and lead intake validation.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::CoreError;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid regex")
});

static HANDLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9._]{1,30}$").expect("valid regex"));

const MAX_NAME_CHARS: usize = 100;
const MAX_CATEGORY_CHARS: usize = 60;
const MAX_BIO_CHARS: usize = 2200;

/// Lifecycle of a creator, in the order it normally advances.
///
/// `lead -> connected -> qualified -> share_enabled`, with `revoked` reachable
/// from every other state and terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreatorStatus {
    Lead,
    Connected,
    Qualified,
    ShareEnabled,
    Revoked,
}

impl CreatorStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CreatorStatus::Lead => "lead",
            CreatorStatus::Connected => "connected",
            CreatorStatus::Qualified => "qualified",
            CreatorStatus::ShareEnabled => "share_enabled",
            CreatorStatus::Revoked => "revoked",
        }
    }

    /// Whether an explicit transition from `self` to `next` is allowed.
    ///
    /// `connected -> qualified` is not one of them: only a recorded
    /// qualification run moves a creator there (see [`Self::after_qualification`]).
    #[must_use]
    pub fn can_transition_to(self, next: CreatorStatus) -> bool {
        use CreatorStatus::{Connected, Lead, Qualified, Revoked, ShareEnabled};

        match (self, next) {
            (Revoked, _) => false,
            (_, Revoked) => true,
            (Lead | Connected, Connected)
            | (ShareEnabled, Qualified)
            | (Qualified, ShareEnabled) => true,
            _ => false,
        }
    }

    /// Validate and return `next`, or the matching transition error.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidStatusTransition`] when the move is not allowed.
    pub fn transition_to(self, next: CreatorStatus) -> Result<CreatorStatus, CoreError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CoreError::InvalidStatusTransition {
                from: self,
                to: next,
            })
        }
    }

    /// Status a creator ends up in after a successful qualification run.
    ///
    /// Returns `None` when the creator cannot be qualified from its current
    /// state (never connected, or revoked). A creator that already enabled
    /// sharing keeps that status.
    #[must_use]
    pub fn after_qualification(self) -> Option<CreatorStatus> {
        match self {
            CreatorStatus::Connected | CreatorStatus::Qualified => Some(CreatorStatus::Qualified),
            CreatorStatus::ShareEnabled => Some(CreatorStatus::ShareEnabled),
            CreatorStatus::Lead | CreatorStatus::Revoked => None,
        }
    }

    /// Status after an OAuth connection completes. Only leads advance; later
    /// states are kept so a reconnect never downgrades a creator.
    #[must_use]
    pub fn after_connection(self) -> CreatorStatus {
        match self {
            CreatorStatus::Lead => CreatorStatus::Connected,
            other => other,
        }
    }
}

impl std::fmt::Display for CreatorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CreatorStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lead" => Ok(CreatorStatus::Lead),
            "connected" => Ok(CreatorStatus::Connected),
            "qualified" => Ok(CreatorStatus::Qualified),
            "share_enabled" => Ok(CreatorStatus::ShareEnabled),
            "revoked" => Ok(CreatorStatus::Revoked),
            other => Err(CoreError::InvalidStatus(other.to_string())),
        }
    }
}

/// A sign-up as submitted by the landing page.
#[derive(Debug, Clone, Deserialize)]
pub struct LeadInput {
    pub name: String,
    pub email: String,
    pub instagram_handle: Option<String>,
    pub declared_category: Option<String>,
    pub bio: Option<String>,
}

impl LeadInput {
    /// Trim, normalize and validate the sign-up.
    ///
    /// Emails are lowercased, a leading `@` on the handle is dropped, and blank
    /// optional fields become `None`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidLead`] describing the first invalid field.
    pub fn validate(self) -> Result<LeadInput, CoreError> {
        let name = self.name.trim().to_string();
        if name.is_empty() || name.chars().count() > MAX_NAME_CHARS {
            return Err(CoreError::InvalidLead(format!(
                "name must be 1-{MAX_NAME_CHARS} characters"
            )));
        }

        let email = self.email.trim().to_lowercase();
        if !EMAIL_RE.is_match(&email) {
            return Err(CoreError::InvalidLead(format!(
                "'{email}' is not a valid email address"
            )));
        }

        let instagram_handle = non_blank(self.instagram_handle)
            .map(|h| h.trim_start_matches('@').to_lowercase());
        if let Some(ref handle) = instagram_handle {
            if !HANDLE_RE.is_match(handle) {
                return Err(CoreError::InvalidLead(format!(
                    "'{handle}' is not a valid Instagram handle"
                )));
            }
        }

        let declared_category = non_blank(self.declared_category);
        if declared_category
            .as_ref()
            .is_some_and(|c| c.chars().count() > MAX_CATEGORY_CHARS)
        {
            return Err(CoreError::InvalidLead(format!(
                "declared category must be at most {MAX_CATEGORY_CHARS} characters"
            )));
        }

        let bio = non_blank(self.bio);
        if bio.as_ref().is_some_and(|b| b.chars().count() > MAX_BIO_CHARS) {
            return Err(CoreError::InvalidLead(format!(
                "bio must be at most {MAX_BIO_CHARS} characters"
            )));
        }

        Ok(LeadInput {
            name,
            email,
            instagram_handle,
            declared_category,
            bio,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead() -> LeadInput {
        LeadInput {
            name: "  Jiwoo Han ".to_string(),
            email: "Jiwoo@Example.com".to_string(),
            instagram_handle: Some("@jiwoo.eats".to_string()),
            declared_category: Some("  ".to_string()),
            bio: Some("sushi lover".to_string()),
        }
    }

    #[test]
    fn status_round_trips_through_str() {
        for status in [
            CreatorStatus::Lead,
            CreatorStatus::Connected,
            CreatorStatus::Qualified,
            CreatorStatus::ShareEnabled,
            CreatorStatus::Revoked,
        ] {
            assert_eq!(status.as_str().parse::<CreatorStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(matches!(
            "archived".parse::<CreatorStatus>(),
            Err(CoreError::InvalidStatus(_))
        ));
    }

    #[test]
    fn forward_transitions_are_allowed() {
        assert!(CreatorStatus::Lead.can_transition_to(CreatorStatus::Connected));
        assert!(CreatorStatus::Qualified.can_transition_to(CreatorStatus::ShareEnabled));
        assert!(CreatorStatus::ShareEnabled.can_transition_to(CreatorStatus::Qualified));
    }

    #[test]
    fn qualified_is_only_reached_through_a_run() {
        assert!(!CreatorStatus::Connected.can_transition_to(CreatorStatus::Qualified));
        assert!(!CreatorStatus::Qualified.can_transition_to(CreatorStatus::Qualified));
        assert_eq!(
            CreatorStatus::Connected.after_qualification(),
            Some(CreatorStatus::Qualified)
        );
    }

    #[test]
    fn skipping_ahead_is_rejected() {
        assert!(!CreatorStatus::Lead.can_transition_to(CreatorStatus::Qualified));
        assert!(!CreatorStatus::Lead.can_transition_to(CreatorStatus::ShareEnabled));
        assert!(!CreatorStatus::Connected.can_transition_to(CreatorStatus::ShareEnabled));
        assert!(!CreatorStatus::Qualified.can_transition_to(CreatorStatus::Connected));
    }

    #[test]
    fn revoked_is_terminal() {
        assert!(CreatorStatus::Qualified.can_transition_to(CreatorStatus::Revoked));
        let err = CreatorStatus::Revoked
            .transition_to(CreatorStatus::Lead)
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidStatusTransition {
                from: CreatorStatus::Revoked,
                to: CreatorStatus::Lead
            }
        ));
    }

    #[test]
    fn qualification_keeps_share_enabled() {
        assert_eq!(
            CreatorStatus::Connected.after_qualification(),
            Some(CreatorStatus::Qualified)
        );
        assert_eq!(
            CreatorStatus::ShareEnabled.after_qualification(),
            Some(CreatorStatus::ShareEnabled)
        );
        assert_eq!(CreatorStatus::Lead.after_qualification(), None);
        assert_eq!(CreatorStatus::Revoked.after_qualification(), None);
    }

    #[test]
    fn reconnect_never_downgrades() {
        assert_eq!(
            CreatorStatus::Lead.after_connection(),
            CreatorStatus::Connected
        );
        assert_eq!(
            CreatorStatus::Qualified.after_connection(),
            CreatorStatus::Qualified
        );
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&CreatorStatus::ShareEnabled).unwrap();
        assert_eq!(json, "\"share_enabled\"");
    }

    #[test]
    fn lead_is_normalized() {
        let lead = lead().validate().expect("valid lead");
        assert_eq!(lead.name, "Jiwoo Han");
        assert_eq!(lead.email, "jiwoo@example.com");
        assert_eq!(lead.instagram_handle.as_deref(), Some("jiwoo.eats"));
        assert!(lead.declared_category.is_none());
        assert_eq!(lead.bio.as_deref(), Some("sushi lover"));
    }

    #[test]
    fn lead_rejects_bad_email() {
        let mut input = lead();
        input.email = "not-an-email".to_string();
        assert!(matches!(input.validate(), Err(CoreError::InvalidLead(_))));
    }

    #[test]
    fn lead_rejects_empty_name() {
        let mut input = lead();
        input.name = "   ".to_string();
        assert!(matches!(input.validate(), Err(CoreError::InvalidLead(_))));
    }

    #[test]
    fn lead_rejects_handle_with_spaces() {
        let mut input = lead();
        input.instagram_handle = Some("jiwoo eats".to_string());
        assert!(matches!(input.validate(), Err(CoreError::InvalidLead(_))));
    }
}
