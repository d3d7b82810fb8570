//! hxcomp web crate.
//!
//! Server side of hypermedia components for htmx:
//!
//! - `component`: the `Component` trait and per-instance descriptor
//!   (name, route prefix, signed or encrypted props).
//! - `handler` + `dispatch`: action tables, the `ActionRouter` seam used by
//!   generated code, and the request lifecycle
//!   (decode, hydrate, route, fold outcome, render).
//! - `registry`: mounting, prefix collision checks, the htmx-header guard
//!   and the error policy.
//! - `outcome`, `flash`, `trigger`, `action`: what handlers return and
//!   what templates emit.
//! - `testing`: server-less harness for component tests.
//! - `adapters::axum` (feature `axum`): mounts a registry on an axum
//!   router.
//!
//! A request ends in exactly one of: forbidden, not found, error callback,
//! redirect, skipped render, or rendered HTML.

pub mod action;
pub mod adapters;
pub mod component;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod flash;
pub mod handler;
pub mod outcome;
pub mod registry;
pub mod request;
pub mod testing;
pub mod trigger;

pub use action::{ActionLink, Swap};
pub use component::{Component, ComponentDescriptor};
pub use config::RegistryConfig;
pub use dispatch::{
    ActionRoute, ActionRouter, ErrorHandler, Invocation, Served, Terminal, default_error_response,
};
pub use error::{ComponentError, ConfigError, NotFound, RegistryError, not_found};
pub use flash::Flash;
pub use handler::{ActionTable, IntoHandler};
pub use outcome::Outcome;
pub use registry::Registry;
pub use request::{ComponentRequest, ComponentResponse, Context};
pub use trigger::{Event, build_trigger_header};

pub use hxcomp_core::{
    Callback, PropsCodec, PropsMap, RouteIdentity, SecurityMode, TokenCodec, TokenError, codec,
    reflect, reflect_props,
};
pub use http;
pub use serde_json;
