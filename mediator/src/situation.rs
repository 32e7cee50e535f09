//! Contact situation classification.
//!
//! Which of the three contact cases applies is derived purely from the
//! acting identity and the target member — never from a separate mode flag.

use foyer_types::{Actor, MemberId};
use serde::{Deserialize, Serialize};

use crate::templates;

/// The classification of one contact attempt. Request-scoped; never stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactSituation {
    /// An anonymous visitor contacts a member; requires a confirmed sender
    /// address.
    VisitorContactsMember,
    /// The target member replies to a visitor who previously contacted
    /// them; the original contact already proved the visitor's address.
    MemberRepliesToVisitor,
    /// One authenticated member messages another; both are
    /// platform-authenticated, no email verification involved.
    MembersMessage,
    /// Visitor flow with a caller-supplied template key, sanitized to a
    /// safe identifier.
    CustomSituation(String),
}

impl ContactSituation {
    /// Classify from the acting identity and the target member.
    pub fn classify(actor: Actor, target: MemberId) -> Self {
        match actor.member_id() {
            None => ContactSituation::VisitorContactsMember,
            Some(id) if id == target => ContactSituation::MemberRepliesToVisitor,
            Some(_) => ContactSituation::MembersMessage,
        }
    }

    /// Like [`classify`](Self::classify), honoring a caller-supplied
    /// situation key on the visitor path. Member paths ignore the key.
    pub fn classify_with_key(actor: Actor, target: MemberId, key: Option<&str>) -> Self {
        match (Self::classify(actor, target), key) {
            (ContactSituation::VisitorContactsMember, Some(key)) => {
                let sanitized = sanitize_key(key);
                if sanitized == templates::TPL_VISITOR_CONTACTS_MEMBER {
                    ContactSituation::VisitorContactsMember
                } else {
                    ContactSituation::CustomSituation(sanitized)
                }
            }
            (situation, _) => situation,
        }
    }

    /// Template key this situation renders with.
    pub fn template_key(&self) -> &str {
        match self {
            ContactSituation::VisitorContactsMember => templates::TPL_VISITOR_CONTACTS_MEMBER,
            ContactSituation::MemberRepliesToVisitor => templates::TPL_MEMBER_REPLIES_VISITOR,
            ContactSituation::MembersMessage => templates::TPL_MEMBER_TO_MEMBER,
            ContactSituation::CustomSituation(key) => key,
        }
    }

    /// Whether the sender's email must be confirmed before dispatch.
    pub fn requires_confirmed_sender(&self) -> bool {
        matches!(
            self,
            ContactSituation::VisitorContactsMember | ContactSituation::CustomSituation(_)
        )
    }
}

/// Reduce a caller-supplied situation key to a safe identifier: lower-case
/// ASCII alphanumerics and dashes. Anything unusable falls back to the
/// standard visitor template key.
pub fn sanitize_key(key: &str) -> String {
    let sanitized: String = key
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c
            } else {
                '-'
            }
        })
        .collect();
    let sanitized = sanitized.trim_matches('-');
    if sanitized.is_empty() {
        templates::TPL_VISITOR_CONTACTS_MEMBER.to_string()
    } else {
        sanitized.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TARGET: MemberId = MemberId::new(9);

    #[test]
    fn visitor_goes_to_first_contact() {
        assert_eq!(
            ContactSituation::classify(Actor::Visitor, TARGET),
            ContactSituation::VisitorContactsMember
        );
    }

    #[test]
    fn target_member_goes_to_reply() {
        assert_eq!(
            ContactSituation::classify(Actor::Member(TARGET), TARGET),
            ContactSituation::MemberRepliesToVisitor
        );
    }

    #[test]
    fn other_member_goes_to_member_message() {
        assert_eq!(
            ContactSituation::classify(Actor::Member(MemberId::new(3)), TARGET),
            ContactSituation::MembersMessage
        );
    }

    #[test]
    fn custom_key_only_applies_to_the_visitor_path() {
        let custom =
            ContactSituation::classify_with_key(Actor::Visitor, TARGET, Some("Event RSVP!"));
        assert_eq!(
            custom,
            ContactSituation::CustomSituation("event-rsvp".to_string())
        );
        assert!(custom.requires_confirmed_sender());

        let reply = ContactSituation::classify_with_key(
            Actor::Member(TARGET),
            TARGET,
            Some("Event RSVP!"),
        );
        assert_eq!(reply, ContactSituation::MemberRepliesToVisitor);
    }

    #[test]
    fn unusable_custom_key_falls_back_to_the_standard_template() {
        assert_eq!(sanitize_key("///"), templates::TPL_VISITOR_CONTACTS_MEMBER);
        assert_eq!(
            ContactSituation::classify_with_key(
                Actor::Visitor,
                TARGET,
                Some(templates::TPL_VISITOR_CONTACTS_MEMBER)
            ),
            ContactSituation::VisitorContactsMember
        );
    }

    #[test]
    fn member_paths_skip_verification() {
        assert!(!ContactSituation::MemberRepliesToVisitor.requires_confirmed_sender());
        assert!(!ContactSituation::MembersMessage.requires_confirmed_sender());
        assert!(ContactSituation::VisitorContactsMember.requires_confirmed_sender());
    }
}
