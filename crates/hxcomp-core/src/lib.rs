//! hxcomp core crate.
//!
//! Everything a component needs that does not touch HTTP lives here:
//!
//! - `codec`: the props map model plus tolerant per-type readers used by
//!   generated codecs, and the compact binary packing of that map.
//! - `reflect`: serde-driven fallback codec for props types without a
//!   generated implementation.
//! - `token`: keyed HMAC signing and AES-GCM encryption of packed props
//!   into URL-safe tokens.
//! - `identity`: stable route prefixes derived from a component's name
//!   and construction site.
//! - `callback`: the legacy callback record kept for older components.
//!
//! Token pipeline:
//!
//! 1. `PropsCodec::encode_props` turns typed props into a `PropsMap`.
//! 2. `codec::pack` serializes the map to MessagePack.
//! 3. `TokenCodec::seal` signs or encrypts the bytes and base64url-encodes.
//!
//! Decoding runs the same steps in reverse and never returns a partially
//! trusted value: every failure is reported as a `TokenError`.

pub mod callback;
pub mod codec;
pub mod error;
pub mod identity;
pub mod reflect;
pub mod token;

pub use callback::{CALLBACK_EVENT, Callback};
pub use codec::{PropsCodec, PropsMap};
pub use error::TokenError;
pub use identity::{DEFAULT_BASE_PATH, RouteIdentity};
pub use token::{SecurityMode, TokenCodec};

pub use serde_json;
