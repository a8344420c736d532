//! HTTP existence checks.

mod client;

pub use client::{HttpClient, UrlProber};

#[cfg(test)]
pub use client::MockUrlProber;
