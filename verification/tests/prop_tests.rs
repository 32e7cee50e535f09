use proptest::prelude::*;

use foyer_store::VerifiedEmailEntry;
use foyer_types::{EmailAddress, EmailHash};
use foyer_verification::{mint_code, VerificationStatus};

proptest! {
    /// Status derivation is total and follows the precedence
    /// spam > confirmed > waiting for any field combination.
    #[test]
    fn status_precedence_is_total(confirmed: bool, spam: bool, code in "[A-Za-z0-9]{0,16}") {
        let mut entry = VerifiedEmailEntry::new(1, EmailHash::of_raw("p@q.com"), code.clone());
        entry.is_confirmed = confirmed;
        entry.is_spam = spam;

        let status = VerificationStatus::of(Some(&entry));
        let expected = if spam {
            VerificationStatus::Spammed
        } else if confirmed {
            VerificationStatus::Confirmed
        } else if !code.is_empty() {
            VerificationStatus::WaitingConfirmation
        } else {
            VerificationStatus::NotCreated
        };
        prop_assert_eq!(status, expected);
    }

    /// Normalization is idempotent, and equal normal forms hash equally.
    #[test]
    fn normalization_idempotent_and_hash_consistent(raw in "[ ]{0,2}[A-Za-z0-9._%+-]{1,16}@[A-Za-z0-9-]{1,10}\\.[A-Za-z]{2,6}[ ]{0,2}") {
        let once = EmailAddress::normalize(&raw);
        let twice = EmailAddress::normalize(&once);
        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(EmailHash::of_raw(&raw), EmailHash::of_raw(&once));
    }

    /// Addresses that parse keep their normalized form.
    #[test]
    fn parsed_addresses_are_normalized(local in "[a-z0-9.]{1,12}", domain in "[a-z0-9]{1,8}\\.[a-z]{2,4}") {
        let raw = format!(" {}@{} ", local.to_uppercase(), domain.to_uppercase());
        if let Ok(addr) = EmailAddress::parse(&raw) {
            prop_assert_eq!(addr.as_str(), EmailAddress::normalize(&raw));
        }
    }
}

#[test]
fn minted_codes_are_sixteen_alphanumerics() {
    for _ in 0..100 {
        let code = mint_code();
        assert_eq!(code.len(), 16);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
