//! Core domain concepts shared across all subdomains.
//!
//! - [`identity::Caller`]: a resolved caller and its [`identity::Role`]
//! - [`error::SessionError`]: rejection reasons for session actions

pub mod error;
pub mod identity;
