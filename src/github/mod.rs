//! GitHub REST client
//!
//! The catalog lives in a GitHub repository; every submission becomes a
//! branch, a commit and a pull request created through this client.

mod client;
mod types;

pub use client::{GitHubClient, GitHubError};
pub use types::*;
