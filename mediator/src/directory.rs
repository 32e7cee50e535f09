//! Member directory collaborator.
//!
//! The host platform owns member accounts; the mediator only needs to
//! resolve an id to a display name, a registered address, and a profile
//! slug. [`StaticDirectory`] serves the standalone daemon and tests.

use std::collections::HashMap;

use foyer_types::{EmailAddress, MemberId};
use serde::{Deserialize, Serialize};

/// A platform member as the contact workflow sees one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    /// Registered address messages to this member are delivered to.
    pub email: EmailAddress,
    /// URL slug of the member's contact page.
    pub slug: String,
}

/// Lookup seam into the host platform's member accounts.
pub trait MemberDirectory: Send + Sync {
    fn find(&self, id: MemberId) -> Option<Member>;
}

/// Fixed member set, loaded from configuration.
#[derive(Default)]
pub struct StaticDirectory {
    members: HashMap<MemberId, Member>,
}

impl StaticDirectory {
    pub fn new(members: impl IntoIterator<Item = Member>) -> Self {
        Self {
            members: members.into_iter().map(|m| (m.id, m)).collect(),
        }
    }
}

impl MemberDirectory for StaticDirectory {
    fn find(&self, id: MemberId) -> Option<Member> {
        self.members.get(&id).cloned()
    }
}
