//! Platform abstraction layer
//!
//! Host drivers that schedule `Session::step` and feed it input:
//! - `web`: browser `requestAnimationFrame` loop with keyboard listeners
//!
//! The native headless driver lives in the binary (`main.rs`).

#[cfg(target_arch = "wasm32")]
pub mod web;
