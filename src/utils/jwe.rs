//! Compact JWE sealing with `RSA-OAEP-256` key wrapping and `A256GCM` content
//! encryption.
//!
//! A token has five base64url (unpadded) segments:
//!
//! ```text
//! BASE64URL(header) . BASE64URL(wrapped CEK) . BASE64URL(IV) . BASE64URL(ciphertext) . BASE64URL(tag)
//! ```
//!
//! The protected header is `{"alg":"RSA-OAEP-256","enc":"A256GCM"}` and its
//! encoded form is the AES-GCM additional authenticated data, so tokens
//! interoperate with standard JOSE libraries.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng, Payload};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

pub const ALG: &str = "RSA-OAEP-256";
pub const ENC: &str = "A256GCM";

const CEK_LEN: usize = 32;
const IV_LEN: usize = 12;
const TAG_LEN: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum JweError {
    #[error("malformed token")]
    Malformed,
    #[error("unsupported token algorithm")]
    UnsupportedAlgorithm,
    #[error("content key wrapping failed: {0}")]
    KeyWrap(rsa::Error),
    #[error("content key unwrapping failed")]
    KeyUnwrap,
    #[error("content encryption failed")]
    Encrypt,
    #[error("token authentication failed")]
    Authentication,
    #[error("header encoding failed: {0}")]
    Header(#[from] serde_json::Error),
}

#[derive(Serialize, Deserialize)]
struct ProtectedHeader {
    alg: String,
    enc: String,
}

/// Seals `plaintext` for the holder of the private half of `public_key`.
pub fn encrypt(public_key: &RsaPublicKey, plaintext: &[u8]) -> Result<String, JweError> {
    let header = serde_json::to_vec(&ProtectedHeader {
        alg: ALG.to_string(),
        enc: ENC.to_string(),
    })?;
    let encoded_header = URL_SAFE_NO_PAD.encode(header);

    let cek = Aes256Gcm::generate_key(OsRng);
    let wrapped_key = public_key
        .encrypt(&mut OsRng, Oaep::new::<Sha256>(), cek.as_slice())
        .map_err(JweError::KeyWrap)?;

    let iv = Aes256Gcm::generate_nonce(&mut OsRng);
    let sealed = Aes256Gcm::new(&cek)
        .encrypt(
            &iv,
            Payload {
                msg: plaintext,
                aad: encoded_header.as_bytes(),
            },
        )
        .map_err(|_| JweError::Encrypt)?;

    // aes-gcm appends the tag to the ciphertext
    let (ciphertext, tag) = sealed.split_at(sealed.len() - TAG_LEN);

    Ok(format!(
        "{}.{}.{}.{}.{}",
        encoded_header,
        URL_SAFE_NO_PAD.encode(wrapped_key),
        URL_SAFE_NO_PAD.encode(iv),
        URL_SAFE_NO_PAD.encode(ciphertext),
        URL_SAFE_NO_PAD.encode(tag),
    ))
}

/// Opens a token produced by [`encrypt`] and returns the plaintext.
///
/// # Errors
///
/// - [`JweError::Malformed`] for anything that is not five valid segments
/// - [`JweError::UnsupportedAlgorithm`] for any other `alg`/`enc` pair
/// - [`JweError::KeyUnwrap`] if the content key was not sealed for this key
/// - [`JweError::Authentication`] if any authenticated byte was altered
pub fn decrypt(private_key: &RsaPrivateKey, token: &str) -> Result<Vec<u8>, JweError> {
    let mut segments = token.split('.');
    let (Some(header), Some(wrapped_key), Some(iv), Some(ciphertext), Some(tag), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(JweError::Malformed);
    };

    let parsed: ProtectedHeader =
        serde_json::from_slice(&decode(header)?).map_err(|_| JweError::Malformed)?;
    if parsed.alg != ALG || parsed.enc != ENC {
        return Err(JweError::UnsupportedAlgorithm);
    }

    let wrapped_key = decode(wrapped_key)?;
    let iv = decode(iv)?;
    let mut sealed = decode(ciphertext)?;
    let tag = decode(tag)?;

    if iv.len() != IV_LEN || tag.len() != TAG_LEN {
        return Err(JweError::Malformed);
    }

    let cek = private_key
        .decrypt(Oaep::new::<Sha256>(), &wrapped_key)
        .map_err(|_| JweError::KeyUnwrap)?;
    if cek.len() != CEK_LEN {
        return Err(JweError::KeyUnwrap);
    }

    let cipher = Aes256Gcm::new_from_slice(&cek).map_err(|_| JweError::KeyUnwrap)?;
    sealed.extend_from_slice(&tag);

    cipher
        .decrypt(
            Nonce::from_slice(&iv),
            Payload {
                msg: &sealed,
                aad: header.as_bytes(),
            },
        )
        .map_err(|_| JweError::Authentication)
}

fn decode(segment: &str) -> Result<Vec<u8>, JweError> {
    URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| JweError::Malformed)
}
