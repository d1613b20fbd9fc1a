//! Identity adapters

mod resolver;

pub use resolver::RosterIdentityResolver;
