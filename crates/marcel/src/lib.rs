//! Client-side data layer for the StrandHub hairstyle catalog.
//!
//! The catalog, action, analysis and upload clients talk to the remote APIs
//! and return typed results; presentation stays with the caller. Records are
//! normalized once on ingest, after which the filter engine and related-item
//! matcher operate on canonical shapes only.

pub mod actions;
pub mod analysis;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod failure;
pub mod filter;
pub mod record;
pub mod related;
pub mod request;
pub mod session;
pub mod upload;

pub use config::ClientConfig;
pub use failure::{Failure, FailureKind};
pub use filter::FilterState;
pub use record::{Comment, Haircut, LikeStatus};
pub use session::CatalogSession;
