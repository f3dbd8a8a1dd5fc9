//! HTTP API integration for the MDU backend

pub mod client;
pub mod endpoints;

pub use client::HttpSubmitter;
