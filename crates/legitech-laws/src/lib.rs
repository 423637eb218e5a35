//! # LegiTech Laws
//!
//! Law records and everything derived from them.
//!
//! - [`law`]: the [`Law`] record, its enums, and the [`LawAnalysis`] merge
//!   patch produced by deep analysis.
//! - [`book`]: the [`LawBook`], an insert-ordered collection seeded with the
//!   base mining knowledge set. Discovered laws are prepended so the newest
//!   record is always first.
//! - [`view`]: derived read models. Tab filtering, case-insensitive search,
//!   and the aggregate compliance figure are computed per request from the
//!   book; none of them are stored.

pub mod book;
pub mod law;
pub mod view;

pub use book::LawBook;
pub use law::{ImpactLevel, Law, LawAnalysis, LawStatus};
pub use view::{derive_view, FilteredView, NavTab};
