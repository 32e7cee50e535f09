use foyer_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("not a well-formed email address: {0}")]
    InvalidEmailFormat(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("this email address was already submitted for verification")]
    AlreadySubmitted,

    #[error("this email address was never submitted for verification")]
    NotSubmitted,

    #[error("this email address is already confirmed")]
    AlreadyConfirmed,

    #[error("this email address was marked as spam")]
    MarkedSpam,

    #[error("the confirmation code does not match")]
    WrongCode,

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
