use crate::codec::{self, PropsCodec};
use crate::error::TokenError;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

pub const KEY_LEN: usize = 32;
pub const MAC_LEN: usize = 16;
pub const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;
const SEPARATOR: char = '.';

/// How a component's props travel to the client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecurityMode {
    /// Readable but tamper-evident: `b64(payload).b64(mac)`.
    #[default]
    Signed,
    /// Confidential and authenticated: `b64(nonce || ciphertext)`.
    Encrypted,
}

/// Keyed token engine shared by every component of a registry.
#[derive(Clone)]
pub struct TokenCodec {
    mac: HmacSha256,
    cipher: Aes256Gcm,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec").finish_non_exhaustive()
    }
}

/// Normalizes a secret to 32 bytes. Exactly 32 bytes are used as-is; any
/// other length is replaced by its SHA-256 digest.
pub fn derive_key(secret: &[u8]) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    if secret.len() == KEY_LEN {
        key.copy_from_slice(secret);
    } else {
        key.copy_from_slice(&Sha256::digest(secret));
    }
    key
}

impl TokenCodec {
    pub fn new(secret: &[u8]) -> Result<Self, TokenError> {
        let key = derive_key(secret);
        let mac = <HmacSha256 as Mac>::new_from_slice(&key)
            .map_err(|e| TokenError::InvalidKey(e.to_string()))?;
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key));
        Ok(Self { mac, cipher })
    }

    /// Random 32-byte secret, base64url encoded, suitable for config files.
    pub fn generate_secret() -> String {
        let mut bytes = [0u8; KEY_LEN];
        rand::rng().fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }

    pub fn encode<P: PropsCodec + ?Sized>(
        &self,
        props: &P,
        mode: SecurityMode,
    ) -> Result<String, TokenError> {
        let map = props.encode_props()?;
        let packed = codec::pack(&map)?;
        self.seal(&packed, mode)
    }

    /// Opens `token` and applies its fields onto `target`. On error
    /// `target` is left as it was.
    pub fn decode_into<P: PropsCodec + ?Sized>(
        &self,
        token: &str,
        mode: SecurityMode,
        target: &mut P,
    ) -> Result<(), TokenError> {
        let packed = self.open(token, mode)?;
        let map = codec::unpack(&packed)?;
        target.decode_props(&map)
    }

    pub fn decode<P: PropsCodec + Default>(
        &self,
        token: &str,
        mode: SecurityMode,
    ) -> Result<P, TokenError> {
        let mut props = P::default();
        self.decode_into(token, mode, &mut props)?;
        Ok(props)
    }

    pub fn seal(&self, payload: &[u8], mode: SecurityMode) -> Result<String, TokenError> {
        match mode {
            SecurityMode::Signed => Ok(self.sign(payload)),
            SecurityMode::Encrypted => self.encrypt(payload),
        }
    }

    pub fn open(&self, token: &str, mode: SecurityMode) -> Result<Vec<u8>, TokenError> {
        let opened = match mode {
            SecurityMode::Signed => self.verify(token),
            SecurityMode::Encrypted => self.decrypt(token),
        };
        if let Err(err) = &opened {
            tracing::debug!(?mode, len = token.len(), error = %err, "token rejected");
        }
        opened
    }

    fn tag(&self, payload: &[u8]) -> [u8; MAC_LEN] {
        let mut mac = self.mac.clone();
        mac.update(payload);
        let full = mac.finalize().into_bytes();
        let mut out = [0u8; MAC_LEN];
        out.copy_from_slice(&full[..MAC_LEN]);
        out
    }

    fn sign(&self, payload: &[u8]) -> String {
        let tag = self.tag(payload);
        format!(
            "{}{SEPARATOR}{}",
            URL_SAFE_NO_PAD.encode(payload),
            URL_SAFE_NO_PAD.encode(tag)
        )
    }

    fn verify(&self, token: &str) -> Result<Vec<u8>, TokenError> {
        let (data, sig) = token
            .split_once(SEPARATOR)
            .ok_or_else(|| TokenError::invalid("missing signature separator"))?;
        let payload = URL_SAFE_NO_PAD
            .decode(data)
            .map_err(|e| TokenError::invalid(format!("payload encoding: {e}")))?;
        let sig = URL_SAFE_NO_PAD
            .decode(sig)
            .map_err(|e| TokenError::invalid(format!("signature encoding: {e}")))?;
        if sig.len() != MAC_LEN {
            return Err(TokenError::SignatureInvalid);
        }
        let expected = self.tag(&payload);
        if bool::from(expected[..].ct_eq(&sig[..])) {
            Ok(payload)
        } else {
            Err(TokenError::SignatureInvalid)
        }
    }

    fn encrypt(&self, payload: &[u8]) -> Result<String, TokenError> {
        let mut nonce = [0u8; NONCE_LEN];
        rand::rng().fill_bytes(&mut nonce);
        let sealed = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce), payload)
            .map_err(|_| TokenError::Encode("seal failed".to_string()))?;
        let mut out = Vec::with_capacity(NONCE_LEN + sealed.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&sealed);
        Ok(URL_SAFE_NO_PAD.encode(out))
    }

    fn decrypt(&self, token: &str) -> Result<Vec<u8>, TokenError> {
        let raw = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|e| TokenError::invalid(format!("ciphertext encoding: {e}")))?;
        if raw.len() < NONCE_LEN + TAG_LEN {
            return Err(TokenError::invalid("ciphertext too short"));
        }
        let (nonce, sealed) = raw.split_at(NONCE_LEN);
        self.cipher
            .decrypt(Nonce::from_slice(nonce), sealed)
            .map_err(|_| TokenError::DecryptFailed)
    }
}
