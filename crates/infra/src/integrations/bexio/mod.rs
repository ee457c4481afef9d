//! Bexio integration
//!
//! Implements the `QuotingPlatform` port against Bexio's quoting API.
//!
//! # Architecture
//!
//! - **Client**: [`BexioClient`] - contact lookup/creation, quote header
//!   creation, tax catalog resolution, position delivery
//! - **Endpoints**: candidate endpoint descriptors for position posts
//!
//! The platform's accepted line-item request shape varies between API
//! generations and path conventions and is not reliably known in advance, so
//! every position is delivered through an ordered list of candidate
//! endpoints, with targeted retries when the response names a rejected
//! `tax_id` or `unit_name`. New upstream quirks are added to the candidate
//! plans in [`endpoints`], not as new branching in the client.
//!
//! # Authentication
//!
//! A bearer token from [`ausmass_domain::BexioConfig`], read from
//! server-side configuration and never exposed to callers. Any 401 response
//! is fatal for the whole export.

pub mod client;
pub mod endpoints;

pub use client::BexioClient;
