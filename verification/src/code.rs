//! Confirmation code minting.

use rand::distr::Alphanumeric;
use rand::Rng;

/// Length of a confirmation code in characters.
pub const CODE_LENGTH: usize = 16;

/// Mint a fresh confirmation code: 16 alphanumeric characters from the
/// thread CSPRNG (~95 bits of entropy). The code is a bearer secret — it is
/// compared for exact string equality and only ever travels through the
/// out-of-band email channel.
pub fn mint_code() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(CODE_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_have_expected_length_and_charset() {
        let code = mint_code();
        assert_eq!(code.len(), CODE_LENGTH);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn codes_are_not_repeated() {
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(mint_code()));
        }
    }
}
