//! Terminal client for the StrandHub hairstyle catalog.

pub mod commands;
pub mod display;
