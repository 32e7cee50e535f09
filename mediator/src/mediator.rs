//! The contact mediator: classification, dispatch, and bookkeeping.

use std::sync::Arc;

use foyer_store::VerifiedEmailEntry;
use foyer_types::{Actor, EmailAddress, MemberId, SiteContext, Timestamp};
use foyer_verification::{SubmittedEntry, VerificationEngine, VerificationStatus};
use tracing::{info, warn};

use crate::directory::{Member, MemberDirectory};
use crate::error::MediatorError;
use crate::mailer::{Mailer, OutboundEmail};
use crate::sanitize::sanitize_message;
use crate::situation::ContactSituation;
use crate::templates;

/// One contact attempt, as the API surface hands it over.
#[derive(Clone, Debug)]
pub struct ContactRequest {
    pub actor: Actor,
    /// The member being contacted (or, on the reply path, doing the
    /// replying).
    pub target: MemberId,
    pub message: String,
    /// Visitor details; required on the visitor and reply paths.
    pub visitor_name: Option<String>,
    pub visitor_email: Option<EmailAddress>,
    /// Caller-supplied situation key, visitor path only.
    pub situation: Option<String>,
}

/// The outcome of a dispatch: whether it went out, and the sender's
/// verification entry when the attempt touched one.
#[derive(Clone, Debug)]
pub struct ContactOutcome {
    pub sent: bool,
    pub entry: Option<VerifiedEmailEntry>,
}

/// Orchestrates the three contact situations. Verification is enforced
/// only where the situation requires it; usage is recorded only after a
/// successful dispatch on the visitor path.
pub struct ContactMediator {
    engine: Arc<VerificationEngine>,
    directory: Arc<dyn MemberDirectory>,
    mailer: Arc<dyn Mailer>,
    site: SiteContext,
}

impl ContactMediator {
    pub fn new(
        engine: Arc<VerificationEngine>,
        directory: Arc<dyn MemberDirectory>,
        mailer: Arc<dyn Mailer>,
        site: SiteContext,
    ) -> Self {
        Self {
            engine,
            directory,
            mailer,
            site,
        }
    }

    /// Dispatch the verification-code message for a fresh submission.
    pub fn send_verification_code(
        &self,
        submitted: &SubmittedEntry,
        visitor_name: &str,
        member: &Member,
    ) -> Result<(), MediatorError> {
        let template = templates::template_for(templates::TPL_VERIFY_VISITOR);
        let member_url = self.site.member_url(&member.slug);
        let (subject, body) = templates::render(
            template,
            &[
                ("site.name", self.site.name.as_str()),
                ("visitor.name", visitor_name),
                ("member.name", member.name.as_str()),
                ("code", submitted.entry.confirmation_code.as_str()),
                ("member.url", member_url.as_str()),
            ],
        );
        self.dispatch(OutboundEmail {
            to: submitted.email.clone(),
            template: templates::TPL_VERIFY_VISITOR.to_string(),
            subject,
            body,
        })
    }

    /// Run one contact attempt end to end.
    pub fn deliver(&self, request: &ContactRequest) -> Result<ContactOutcome, MediatorError> {
        let situation = ContactSituation::classify_with_key(
            request.actor,
            request.target,
            request.situation.as_deref(),
        );
        match situation {
            ContactSituation::VisitorContactsMember | ContactSituation::CustomSituation(_) => {
                self.visitor_contacts_member(request, &situation)
            }
            ContactSituation::MemberRepliesToVisitor => self.member_replies_to_visitor(request),
            ContactSituation::MembersMessage => self.member_messages_member(request),
        }
    }

    /// Case A: anonymous visitor contacts a member. The sender's address
    /// must be confirmed; usage is recorded after a successful send.
    fn visitor_contacts_member(
        &self,
        request: &ContactRequest,
        situation: &ContactSituation,
    ) -> Result<ContactOutcome, MediatorError> {
        let member = self.member(request.target)?;
        let visitor_email = request
            .visitor_email
            .as_ref()
            .ok_or(MediatorError::MissingVisitorEmail)?;
        let visitor_name = request.visitor_name.as_deref().unwrap_or("A visitor");

        let hash = visitor_email.hash();
        let entry = self.engine.store().find_by_hash(&hash)?;
        let entry = match entry {
            Some(entry) if VerificationStatus::of(Some(&entry)) == VerificationStatus::Confirmed => {
                entry
            }
            _ => {
                warn!(member = %request.target, "visitor contact blocked: sender not confirmed");
                return Err(MediatorError::EmailNotConfirmed);
            }
        };

        let content = sanitize_message(&request.message);
        let member_url = self.site.member_url(&member.slug);
        let template = templates::template_for(situation.template_key());
        let (subject, body) = templates::render(
            template,
            &[
                ("site.name", self.site.name.as_str()),
                ("visitor.name", visitor_name),
                ("visitor.email", visitor_email.as_str()),
                ("member.name", member.name.as_str()),
                ("content", content.as_str()),
                ("member.url", member_url.as_str()),
            ],
        );
        self.dispatch(OutboundEmail {
            to: member.email.clone(),
            template: situation.template_key().to_string(),
            subject,
            body,
        })?;

        // Bookkeeping happens only after a confirmed successful dispatch.
        self.engine
            .store()
            .update_last_sent(entry.id, Timestamp::now())?;
        let entry = self.engine.store().find_by_id(entry.id)?;
        Ok(ContactOutcome { sent: true, entry })
    }

    /// Case B: the target member replies to a visitor. The original contact
    /// already proved the visitor's address; no re-check, no bookkeeping.
    fn member_replies_to_visitor(
        &self,
        request: &ContactRequest,
    ) -> Result<ContactOutcome, MediatorError> {
        let member = self.member(request.target)?;
        let visitor_email = request
            .visitor_email
            .as_ref()
            .ok_or(MediatorError::MissingVisitorEmail)?;

        let content = sanitize_message(&request.message);
        let member_url = self.site.member_url(&member.slug);
        let template = templates::template_for(templates::TPL_MEMBER_REPLIES_VISITOR);
        let (subject, body) = templates::render(
            template,
            &[
                ("site.name", self.site.name.as_str()),
                ("member.name", member.name.as_str()),
                ("content", content.as_str()),
                ("member.url", member_url.as_str()),
            ],
        );
        self.dispatch(OutboundEmail {
            to: visitor_email.clone(),
            template: templates::TPL_MEMBER_REPLIES_VISITOR.to_string(),
            subject,
            body,
        })?;

        Ok(ContactOutcome {
            sent: true,
            entry: None,
        })
    }

    /// Case C: one authenticated member messages another. Both parties are
    /// platform-authenticated; verification status is irrelevant.
    fn member_messages_member(
        &self,
        request: &ContactRequest,
    ) -> Result<ContactOutcome, MediatorError> {
        // Classification only routes here for an authenticated actor; a
        // visitor on this path is refused like any unverified sender.
        let sender_id = request
            .actor
            .member_id()
            .ok_or(MediatorError::EmailNotConfirmed)?;
        let sender = self.member(sender_id)?;
        let target = self.member(request.target)?;

        let content = sanitize_message(&request.message);
        let sender_url = self.site.member_url(&sender.slug);
        let template = templates::template_for(templates::TPL_MEMBER_TO_MEMBER);
        let (subject, body) = templates::render(
            template,
            &[
                ("site.name", self.site.name.as_str()),
                ("sender.name", sender.name.as_str()),
                ("content", content.as_str()),
                ("sender.url", sender_url.as_str()),
            ],
        );
        self.dispatch(OutboundEmail {
            to: target.email.clone(),
            template: templates::TPL_MEMBER_TO_MEMBER.to_string(),
            subject,
            body,
        })?;

        Ok(ContactOutcome {
            sent: true,
            entry: None,
        })
    }

    fn member(&self, id: MemberId) -> Result<Member, MediatorError> {
        self.directory
            .find(id)
            .ok_or(MediatorError::UnknownMember(id))
    }

    fn dispatch(&self, email: OutboundEmail) -> Result<(), MediatorError> {
        self.mailer
            .send(&email)
            .map_err(|e| MediatorError::DeliveryFailed(e.to_string()))?;
        info!(template = %email.template, "message dispatched");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::StaticDirectory;
    use crate::mailer::RecordingMailer;
    use foyer_store::{MemoryStore, VerifiedEmailStore};

    struct Fixture {
        mediator: ContactMediator,
        engine: Arc<VerificationEngine>,
        mailer: Arc<RecordingMailer>,
    }

    fn member(id: u64, name: &str, email: &str, slug: &str) -> Member {
        Member {
            id: MemberId::new(id),
            name: name.to_string(),
            email: EmailAddress::parse(email).unwrap(),
            slug: slug.to_string(),
        }
    }

    fn fixture() -> Fixture {
        let store: Arc<dyn VerifiedEmailStore> = Arc::new(MemoryStore::new());
        let engine = Arc::new(VerificationEngine::new(store));
        let directory = Arc::new(StaticDirectory::new([
            member(1, "Jane", "jane@example.org", "jane"),
            member(2, "Omar", "omar@example.org", "omar"),
        ]));
        let mailer = Arc::new(RecordingMailer::new());
        let mediator = ContactMediator::new(
            engine.clone(),
            directory,
            mailer.clone(),
            SiteContext::new("Example", "https://example.org"),
        );
        Fixture {
            mediator,
            engine,
            mailer,
        }
    }

    fn visitor_request(target: u64, email: Option<&str>) -> ContactRequest {
        ContactRequest {
            actor: Actor::Visitor,
            target: MemberId::new(target),
            message: "Hello <p>there</p><script>x</script>".to_string(),
            visitor_name: Some("Ada".to_string()),
            visitor_email: email.map(|e| EmailAddress::parse(e).unwrap()),
            situation: None,
        }
    }

    fn confirm(fixture: &Fixture, email: &str) -> VerifiedEmailEntry {
        let submitted = fixture.engine.submit(email).unwrap();
        fixture
            .engine
            .validate(email, &submitted.entry.confirmation_code)
            .unwrap()
    }

    #[test]
    fn unconfirmed_visitor_is_blocked_without_any_send() {
        let fixture = fixture();
        fixture.engine.submit("ada@test.com").unwrap();

        let err = fixture
            .mediator
            .deliver(&visitor_request(1, Some("ada@test.com")))
            .unwrap_err();
        assert!(matches!(err, MediatorError::EmailNotConfirmed));
        assert!(fixture.mailer.sent().is_empty());

        let entry = fixture
            .engine
            .store()
            .find_by_hash(&EmailAddress::parse("ada@test.com").unwrap().hash())
            .unwrap()
            .unwrap();
        assert_eq!(entry.date_last_email_sent, None);
    }

    #[test]
    fn confirmed_visitor_contact_sends_and_records_usage() {
        let fixture = fixture();
        let entry = confirm(&fixture, "ada@test.com");
        assert_eq!(entry.date_last_email_sent, None);

        let outcome = fixture
            .mediator
            .deliver(&visitor_request(1, Some("ada@test.com")))
            .unwrap();
        assert!(outcome.sent);
        assert!(outcome.entry.unwrap().date_last_email_sent.is_some());

        let sent = fixture.mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to.as_str(), "jane@example.org");
        assert_eq!(sent[0].template, "visitor-contacts-member");
        // Message content sanitized before interpolation.
        assert!(sent[0].body.contains("Hello <p>there</p>x"));
        assert!(!sent[0].body.contains("<script>"));
        assert!(sent[0].body.contains("https://example.org/members/jane/"));
    }

    #[test]
    fn visitor_contact_without_email_is_rejected() {
        let fixture = fixture();
        let err = fixture
            .mediator
            .deliver(&visitor_request(1, None))
            .unwrap_err();
        assert!(matches!(err, MediatorError::MissingVisitorEmail));
    }

    #[test]
    fn unknown_target_member_fails() {
        let fixture = fixture();
        confirm(&fixture, "ada@test.com");
        let err = fixture
            .mediator
            .deliver(&visitor_request(42, Some("ada@test.com")))
            .unwrap_err();
        assert!(matches!(err, MediatorError::UnknownMember(_)));
    }

    #[test]
    fn member_reply_skips_verification_and_bookkeeping() {
        let fixture = fixture();
        // No entry exists for the visitor at all.
        let request = ContactRequest {
            actor: Actor::Member(MemberId::new(1)),
            target: MemberId::new(1),
            message: "Thanks for reaching out".to_string(),
            visitor_name: None,
            visitor_email: Some(EmailAddress::parse("ada@test.com").unwrap()),
            situation: None,
        };
        let outcome = fixture.mediator.deliver(&request).unwrap();
        assert!(outcome.sent);
        assert!(outcome.entry.is_none());

        let sent = fixture.mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to.as_str(), "ada@test.com");
        assert_eq!(sent[0].template, "member-replies-visitor");
        assert_eq!(fixture.engine.store().count().unwrap(), 0);
    }

    #[test]
    fn member_to_member_ignores_sender_verification_status() {
        let fixture = fixture();
        let request = ContactRequest {
            actor: Actor::Member(MemberId::new(2)),
            target: MemberId::new(1),
            message: "Lunch?".to_string(),
            visitor_name: None,
            visitor_email: None,
            situation: None,
        };
        let outcome = fixture.mediator.deliver(&request).unwrap();
        assert!(outcome.sent);
        assert!(outcome.entry.is_none());

        let sent = fixture.mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to.as_str(), "jane@example.org");
        assert_eq!(sent[0].template, "member-to-member");
        assert!(sent[0].body.contains("Omar"));
        assert!(sent[0].body.contains("https://example.org/members/omar/"));
    }

    #[test]
    fn delivery_failure_leaves_the_store_unchanged() {
        let fixture = fixture();
        confirm(&fixture, "ada@test.com");
        fixture.mailer.set_failing(true);

        let err = fixture
            .mediator
            .deliver(&visitor_request(1, Some("ada@test.com")))
            .unwrap_err();
        assert!(matches!(err, MediatorError::DeliveryFailed(_)));

        let entry = fixture
            .engine
            .store()
            .find_by_hash(&EmailAddress::parse("ada@test.com").unwrap().hash())
            .unwrap()
            .unwrap();
        assert_eq!(entry.date_last_email_sent, None);
    }

    #[test]
    fn custom_situation_uses_sanitized_key_and_still_requires_confirmation() {
        let fixture = fixture();
        confirm(&fixture, "ada@test.com");

        let mut request = visitor_request(1, Some("ada@test.com"));
        request.situation = Some("Event RSVP!".to_string());
        let outcome = fixture.mediator.deliver(&request).unwrap();
        assert!(outcome.sent);

        let sent = fixture.mailer.sent();
        assert_eq!(sent[0].template, "event-rsvp");
    }

    #[test]
    fn store_failures_surface_through_deliver() {
        use foyer_store::{EntryPage, EntryQuery, StoreError};
        use foyer_types::EmailHash;

        struct BrokenStore;

        impl BrokenStore {
            fn fail<T>(&self) -> Result<T, StoreError> {
                Err(StoreError::Backend("disk offline".to_string()))
            }
        }

        impl VerifiedEmailStore for BrokenStore {
            fn insert(&self, _: &EmailHash, _: &str) -> Result<u64, StoreError> {
                self.fail()
            }
            fn find_by_hash(&self, _: &EmailHash) -> Result<Option<VerifiedEmailEntry>, StoreError> {
                self.fail()
            }
            fn find_by_id(&self, _: u64) -> Result<Option<VerifiedEmailEntry>, StoreError> {
                self.fail()
            }
            fn query(&self, _: &EntryQuery) -> Result<EntryPage, StoreError> {
                self.fail()
            }
            fn update_confirmed(&self, _: u64, _: Timestamp) -> Result<(), StoreError> {
                self.fail()
            }
            fn update_spam(&self, _: u64, _: bool) -> Result<bool, StoreError> {
                self.fail()
            }
            fn update_last_sent(&self, _: u64, _: Timestamp) -> Result<(), StoreError> {
                self.fail()
            }
            fn count(&self) -> Result<u64, StoreError> {
                self.fail()
            }
        }

        let engine = Arc::new(VerificationEngine::new(Arc::new(BrokenStore)));
        let directory = Arc::new(StaticDirectory::new([member(
            1,
            "Jane",
            "jane@example.org",
            "jane",
        )]));
        let mailer = Arc::new(RecordingMailer::new());
        let mediator = ContactMediator::new(
            engine,
            directory,
            mailer.clone(),
            SiteContext::new("Example", "https://example.org"),
        );

        let err = mediator
            .deliver(&visitor_request(1, Some("ada@test.com")))
            .unwrap_err();
        assert!(matches!(err, MediatorError::Store(StoreError::Backend(_))));
        assert!(mailer.sent().is_empty());
    }

    #[test]
    fn verification_code_message_carries_the_code() {
        let fixture = fixture();
        let submitted = fixture.engine.submit("ada@test.com").unwrap();
        let member = member(1, "Jane", "jane@example.org", "jane");

        fixture
            .mediator
            .send_verification_code(&submitted, "Ada", &member)
            .unwrap();

        let sent = fixture.mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to.as_str(), "ada@test.com");
        assert_eq!(sent[0].template, "verify-visitor-email");
        assert!(sent[0].body.contains(&submitted.entry.confirmation_code));
    }
}
