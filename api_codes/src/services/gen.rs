use argon2::password_hash::rand_core::{OsRng, RngCore};
use common::misc::AccountType;
use db::dtos::code::NewCode;

pub(crate) const CODE_PREFIX: &str = "XENON-";
const CODE_RANDOM_BYTES: usize = 12;

/// Produces a fresh redemption code for the given role: the `XENON-` prefix
/// followed by 12 bytes of OS randomness as uppercase hex. Collisions are
/// caught by the primary key on `code_string`.
pub fn generate_code(account_type: AccountType) -> NewCode {
    let mut bytes = [0u8; CODE_RANDOM_BYTES];
    OsRng.fill_bytes(&mut bytes);

    let hex: String = bytes.iter().map(|byte| format!("{:02X}", byte)).collect();

    NewCode {
        code_string: format!("{}{}", CODE_PREFIX, hex),
        account_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_code_has_prefix_and_fixed_length() {
        let code = generate_code(AccountType::User);
        assert!(code.code_string.starts_with(CODE_PREFIX));
        assert_eq!(code.code_string.len(), CODE_PREFIX.len() + CODE_RANDOM_BYTES * 2);
    }

    #[test]
    fn generated_code_body_is_uppercase_hex() {
        let code = generate_code(AccountType::Creator);
        let body = &code.code_string[CODE_PREFIX.len()..];
        assert!(body.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(!body.chars().any(|c| c.is_ascii_lowercase()));
    }

    #[test]
    fn generated_code_keeps_the_requested_role() {
        assert_eq!(generate_code(AccountType::User).account_type, AccountType::User);
        assert_eq!(
            generate_code(AccountType::Creator).account_type,
            AccountType::Creator
        );
    }

    #[test]
    fn consecutive_codes_differ() {
        let first = generate_code(AccountType::User);
        let second = generate_code(AccountType::User);
        assert_ne!(first.code_string, second.code_string);
    }
}
