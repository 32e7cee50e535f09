use foyer_store::StoreError;
use foyer_types::MemberId;
use foyer_verification::VerificationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediatorError {
    #[error("the sender's email address is not confirmed")]
    EmailNotConfirmed,

    #[error("member {0} does not exist")]
    UnknownMember(MemberId),

    #[error("a visitor address is required for this contact situation")]
    MissingVisitorEmail,

    #[error("message delivery failed: {0}")]
    DeliveryFailed(String),

    #[error(transparent)]
    Verification(#[from] VerificationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
