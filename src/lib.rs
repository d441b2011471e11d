//! qr-dispatch — classification and action dispatch for decoded QR payloads.

pub mod config;
pub mod error;
pub mod pipeline;
