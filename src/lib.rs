//! # statewatch
//!
//! Scrapes head-of-state news from publishers in Nigeria, Ghana, The Gambia,
//! Kenya, Liberia and Sierra Leone, normalizes each article into a [`models::Post`]
//! and summarizes approved posts into categorized [`models::Activity`] records
//! with an OpenAI-compatible model.
//!
//! ## Pipelines
//!
//! 1. **Scraping** ([`scrapers`], [`orchestrator`]): one declarative adapter per
//!    publisher, run concurrently; each adapter's failures stay its own
//! 2. **Summarizing** ([`activities`]): approved, unprocessed posts go to the
//!    model; replies become activities tagged with categories
//! 3. **Scheduling** ([`jobs`]): the entry points an external scheduler fires
//!
//! Storage sits behind the [`store::Store`] trait, page retrieval behind
//! [`fetch::PageFetcher`] and the model behind [`api::AskAsync`].

pub mod activities;
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod jobs;
pub mod models;
pub mod orchestrator;
pub mod scrapers;
pub mod store;
pub mod utils;
pub mod window;

#[cfg(test)]
pub(crate) mod test_support;
