//! Short code generation.
//!
//! Codes are 9 random bytes from the OS generator encoded as URL-safe base64
//! without padding, giving 12 characters and a 72-bit code space. Codes are
//! not checked for uniqueness before use; the link store's unique index turns
//! the (negligible) collision case into a conflict error.

use base64::Engine as _;

/// Length of random bytes before base64 encoding.
const CODE_LENGTH_BYTES: usize = 9;

/// Length of every generated code.
pub const CODE_LENGTH: usize = 12;

/// Generates a cryptographically secure random short code.
///
/// # Errors
///
/// Returns the OS error if the system random number generator fails.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code()?;
/// assert_eq!(code.len(), 12);
/// assert!(code.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_'));
/// ```
pub fn generate_code() -> Result<String, getrandom::Error> {
    let mut buffer = [0u8; CODE_LENGTH_BYTES];

    getrandom::fill(&mut buffer)?;

    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer))
}
