//! Chat platform adapter

pub mod client;

pub use client::ChatClientImpl;
