//! Krushi Mitra farm onboarding core.

pub mod cli;
pub mod config;
pub mod error;
pub mod onboarding;
pub mod reference;
pub mod store;
