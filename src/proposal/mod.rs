//! Proposal module - catalog changes submitted as pull requests
//!
//! Handles proposal bodies, branch naming, and the GitHub workflow that
//! turns an item change into a reviewable pull request.

pub mod branch;
mod manager;
mod models;

pub use manager::ProposalManager;
pub use models::*;
