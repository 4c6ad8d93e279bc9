//! External API integrations

pub mod generative;

pub use generative::GenerativeTextClient;
