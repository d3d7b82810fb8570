use thiserror::Error;

/// Failure while building or opening a props token.
///
/// `InvalidFormat` means the token could not even be parsed (wrong mode,
/// bad base64, truncated below the minimum length, undecodable payload).
/// `SignatureInvalid` and `DecryptFailed` mean the bytes were well formed
/// but failed authentication.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("invalid props token: {0}")]
    InvalidFormat(String),
    #[error("props signature invalid")]
    SignatureInvalid,
    #[error("props decryption failed")]
    DecryptFailed,
    #[error("props encoding failed: {0}")]
    Encode(String),
    #[error("invalid key material: {0}")]
    InvalidKey(String),
}

impl TokenError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidFormat(msg.into())
    }

    /// True when the token parsed but failed authentication.
    pub fn is_tampered(&self) -> bool {
        matches!(self, Self::SignatureInvalid | Self::DecryptFailed)
    }

    /// True for every failure caused by the client-supplied token rather
    /// than by server-side encoding.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidFormat(_) | Self::SignatureInvalid | Self::DecryptFailed
        )
    }
}
