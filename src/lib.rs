#![forbid(unsafe_code)]

//! Building blocks for the tubegrab HTTP service.
//!
//! Everything that matters lives in the library: request handlers,
//! configuration, duration parsing, and the yt-dlp plumbing. The backend
//! binary stays a thin shell so tests can drive the exact code paths the
//! server runs in production.

pub mod api;
pub mod config;
pub mod download;
pub mod duration;
pub mod security;
pub mod youtube;

#[cfg(test)]
mod testutil;
