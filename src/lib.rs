//! YouTube feed for the podcast site.
//!
//! Fetches the channel and its latest uploads from the YouTube Data API v3,
//! splits uploads into reels and long-form videos, and keeps the results in
//! a 7-day JSON file cache.

pub mod cache;
pub mod config;
pub mod error;
pub mod feed;
pub mod sources;
pub mod ui;
