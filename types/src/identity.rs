//! Member and actor identity types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric identifier of a platform member.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MemberId(u64);

impl MemberId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who is performing a request: an anonymous visitor or an authenticated
/// member. Absence of identity is a variant, never a zero-valued id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Actor {
    Visitor,
    Member(MemberId),
}

impl Actor {
    /// Map a wire-level optional user id to an actor. Legacy clients send
    /// `0` for "no user"; that sentinel is confined to this boundary.
    pub fn from_wire(id: Option<u64>) -> Self {
        match id {
            None | Some(0) => Actor::Visitor,
            Some(n) => Actor::Member(MemberId::new(n)),
        }
    }

    pub fn member_id(&self) -> Option<MemberId> {
        match self {
            Actor::Visitor => None,
            Actor::Member(id) => Some(*id),
        }
    }

    pub fn is_visitor(&self) -> bool {
        matches!(self, Actor::Visitor)
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Actor::Visitor => f.write_str("visitor"),
            Actor::Member(id) => write!(f, "member:{id}"),
        }
    }
}
