//! # LegiTech Advisor
//!
//! HTTP adapter for the Gemini `generateContent` API, specialized for
//! regulatory advisory work.
//!
//! ## Architecture
//!
//! [`GeminiClient`] wraps a `reqwest::Client` with the base URL, API key
//! header, and request/response mapping. It is `Send + Sync` and designed to
//! be shared via `Arc` across async tasks.
//!
//! ## Degradation
//!
//! Internal request methods return `Result` with diagnostic context. The
//! public advisory surface deliberately does not: discovery returns `None`
//! on any failure, deep analysis returns a labeled fallback patch, chat
//! returns a fallback reply, and evidence audit returns a failed verdict
//! with zero confidence. Upstream flakiness degrades the product, it never
//! breaks it. The raw [`GeminiClient::generate`] proxy is the one exception
//! and surfaces its error to the caller.

pub mod chat;
pub mod client;
pub mod error;
pub mod persona;
mod wire;

pub use chat::{AuditResult, ChatMessage, ChatRole, ChatTurn};
pub use client::{GeminiClient, GeminiConfig};
pub use error::AdvisorError;
