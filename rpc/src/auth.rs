//! Request identity and authorization policy.
//!
//! The gateway does not authenticate callers itself; a fronting proxy
//! is expected to resolve the session and forward the member id and
//! capability set as trusted headers.

use axum::http::HeaderMap;
use foyer_types::Actor;

use crate::error::ApiError;

/// Header carrying the authenticated member id, if any.
pub const MEMBER_HEADER: &str = "x-foyer-member";
/// Header carrying a comma-separated capability list.
pub const CAPS_HEADER: &str = "x-foyer-caps";

/// Capability required for listing and moderating entries.
pub const CAP_MODERATE_EMAILS: &str = "moderate-emails";

/// Who is making the request, as asserted by the fronting proxy.
#[derive(Debug, Clone)]
pub struct RequestIdentity {
    pub actor: Actor,
    pub capabilities: Vec<String>,
}

impl RequestIdentity {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let member = headers
            .get(MEMBER_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let capabilities = headers
            .get(CAPS_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|v| {
                v.split(',')
                    .map(|cap| cap.trim().to_string())
                    .filter(|cap| !cap.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        RequestIdentity {
            actor: Actor::from_wire(member),
            capabilities,
        }
    }

    pub fn has_capability(&self, cap: &str) -> bool {
        self.capabilities.iter().any(|c| c == cap)
    }
}

/// Outcome of a policy check.
#[derive(Debug)]
pub enum Decision {
    Allow,
    Deny(String),
}

impl Decision {
    pub fn require(cond: bool, reason: &str) -> Decision {
        if cond {
            Decision::Allow
        } else {
            Decision::Deny(reason.to_string())
        }
    }

    pub fn into_result(self) -> Result<(), ApiError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(ApiError::AuthorizationRequired(reason)),
        }
    }
}

/// Per-operation authorization. Implementations decide from the request
/// identity alone; handlers never inspect capabilities directly.
pub trait AuthorizationPolicy: Send + Sync {
    fn can_list(&self, who: &RequestIdentity) -> Decision;
    fn can_create(&self, who: &RequestIdentity) -> Decision;
    fn can_check(&self, who: &RequestIdentity) -> Decision;
    fn can_validate(&self, who: &RequestIdentity) -> Decision;
    fn can_send(&self, who: &RequestIdentity) -> Decision;
    fn can_moderate(&self, who: &RequestIdentity) -> Decision;
    fn can_delete(&self, who: &RequestIdentity) -> Decision;
}

/// Default policy: the public contact flow is open to anyone, while
/// listing and moderation require the `moderate-emails` capability.
pub struct CapabilityPolicy;

impl CapabilityPolicy {
    fn moderator(&self, who: &RequestIdentity) -> Decision {
        Decision::require(
            who.has_capability(CAP_MODERATE_EMAILS),
            "the moderate-emails capability is required",
        )
    }
}

impl AuthorizationPolicy for CapabilityPolicy {
    fn can_list(&self, who: &RequestIdentity) -> Decision {
        self.moderator(who)
    }

    fn can_create(&self, _who: &RequestIdentity) -> Decision {
        Decision::Allow
    }

    fn can_check(&self, _who: &RequestIdentity) -> Decision {
        Decision::Allow
    }

    fn can_validate(&self, _who: &RequestIdentity) -> Decision {
        Decision::Allow
    }

    fn can_send(&self, _who: &RequestIdentity) -> Decision {
        Decision::Allow
    }

    fn can_moderate(&self, who: &RequestIdentity) -> Decision {
        self.moderator(who)
    }

    fn can_delete(&self, who: &RequestIdentity) -> Decision {
        self.moderator(who)
    }
}
