//! Message template catalog.
//!
//! Each template carries a subject and body with `{{token}}` placeholders.
//! Rendering replaces known tokens and leaves unknown ones untouched, so a
//! template typo is visible in the delivered message instead of silently
//! vanishing. Custom situation keys fall back to the standard visitor
//! template text.

/// Verification code delivery to a visitor.
pub const TPL_VERIFY_VISITOR: &str = "verify-visitor-email";
/// A visitor's first contact message to a member.
pub const TPL_VISITOR_CONTACTS_MEMBER: &str = "visitor-contacts-member";
/// A member's reply to a visitor.
pub const TPL_MEMBER_REPLIES_VISITOR: &str = "member-replies-visitor";
/// A message between two authenticated members.
pub const TPL_MEMBER_TO_MEMBER: &str = "member-to-member";

pub struct MessageTemplate {
    pub key: &'static str,
    pub subject: &'static str,
    pub body: &'static str,
}

const CATALOG: &[MessageTemplate] = &[
    MessageTemplate {
        key: TPL_VERIFY_VISITOR,
        subject: "[{{site.name}}] Your email validation code",
        body: "Hello {{visitor.name}},\n\n\
               You asked to contact {{member.name}}. To make sure your email \
               address is valid, please enter the code {{code}} in the \
               \"Validation code\" field of {{member.name}}'s contact form.\n\n\
               To get back to the contact form, follow this link: \
               <a href=\"{{member.url}}\">continue my message to {{member.name}}</a>.\n\n\
               This validation step is only needed the first time you get in \
               touch through our site. Thanks for your understanding.",
    },
    MessageTemplate {
        key: TPL_VISITOR_CONTACTS_MEMBER,
        subject: "[{{site.name}}] A site visitor is contacting you",
        body: "{{visitor.name}} ({{visitor.email}}) contacted you. \
               Here is their message:\n\n{{content}}\n\n\
               You can <a href=\"mailto:{{visitor.email}}\">reply directly</a> \
               or use the site to avoid sharing your own email address: \
               <a href=\"{{member.url}}\">reply from the site</a>.",
    },
    MessageTemplate {
        key: TPL_MEMBER_REPLIES_VISITOR,
        subject: "[{{site.name}}] {{member.name}} replied to you",
        body: "Hello,\n\nHere is the reply:\n\n{{content}}\n\n\
               To contact {{member.name}} again, you can use their \
               <a href=\"{{member.url}}\">contact form on our site</a>.",
    },
    MessageTemplate {
        key: TPL_MEMBER_TO_MEMBER,
        subject: "[{{site.name}}] {{sender.name}} sent you a message",
        body: "{{sender.name}} sent you this message:\n\n{{content}}\n\n\
               You can reply from <a href=\"{{sender.url}}\">their contact page</a>.",
    },
];

/// Look up a template by key. Unknown keys (custom situations) get the
/// standard visitor-contact template text.
pub fn template_for(key: &str) -> &'static MessageTemplate {
    CATALOG
        .iter()
        .find(|t| t.key == key)
        .unwrap_or_else(|| {
            CATALOG
                .iter()
                .find(|t| t.key == TPL_VISITOR_CONTACTS_MEMBER)
                .expect("catalog contains the standard visitor template")
        })
}

/// Replace `{{token}}` placeholders in subject and body.
pub fn render(template: &MessageTemplate, tokens: &[(&str, &str)]) -> (String, String) {
    let substitute = |text: &str| {
        let mut rendered = text.to_string();
        for (token, value) in tokens {
            rendered = rendered.replace(&format!("{{{{{token}}}}}"), value);
        }
        rendered
    };
    (substitute(template.subject), substitute(template.body))
}
