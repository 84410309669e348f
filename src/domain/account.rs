//! User accounts and registration validation.

/// A registered user. `cash` is the virtual balance mutated by trades; it is
/// never allowed to go negative.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub cash: f64,
}

/// Registration rejections, in the order the fields are checked.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegisterError {
    #[error("missing username")]
    MissingUsername,

    #[error("username is already taken")]
    UsernameTaken,

    #[error("missing password")]
    MissingPassword,

    #[error("missing confirmation password")]
    MissingConfirmation,

    #[error("passwords don't match")]
    PasswordMismatch,
}

/// Validate a registration form. Uniqueness of the username is checked against
/// the store by the caller; this covers the pure field checks.
pub fn validate_registration(
    username: &str,
    password: &str,
    confirmation: &str,
) -> Result<(), RegisterError> {
    if username.is_empty() {
        return Err(RegisterError::MissingUsername);
    }
    if password.is_empty() {
        return Err(RegisterError::MissingPassword);
    }
    if confirmation.is_empty() {
        return Err(RegisterError::MissingConfirmation);
    }
    if password != confirmation {
        return Err(RegisterError::PasswordMismatch);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_registration_passes() {
        assert_eq!(validate_registration("alice", "pw1", "pw1"), Ok(()));
    }

    #[test]
    fn missing_username_rejected() {
        assert_eq!(
            validate_registration("", "pw1", "pw1"),
            Err(RegisterError::MissingUsername)
        );
    }

    #[test]
    fn missing_password_rejected() {
        assert_eq!(
            validate_registration("alice", "", ""),
            Err(RegisterError::MissingPassword)
        );
    }

    #[test]
    fn missing_confirmation_rejected() {
        assert_eq!(
            validate_registration("alice", "pw1", ""),
            Err(RegisterError::MissingConfirmation)
        );
    }

    #[test]
    fn mismatched_passwords_rejected() {
        assert_eq!(
            validate_registration("alice", "pw1", "pw2"),
            Err(RegisterError::PasswordMismatch)
        );
    }
}
