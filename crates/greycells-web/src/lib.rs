#![forbid(unsafe_code)]

//! WASM frontend for the GreyCells site.
//!
//! Binds the host-independent controller in `greycells-core` to a browser
//! page and exports it via `wasm-bindgen`:
//! - resolves the page's elements and wires DOM listeners,
//! - runs timers, animation frames and visibility observers,
//! - performs `fetch` calls against the contacts API,
//! - routes `tracing` output to the browser console.

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod http;
#[cfg(target_arch = "wasm32")]
mod logging;
#[cfg(target_arch = "wasm32")]
mod observer;
#[cfg(target_arch = "wasm32")]
mod runtime;
#[cfg(target_arch = "wasm32")]
mod timestamp;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::GreyCellsSite;

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct GreyCellsSite;

#[cfg(not(target_arch = "wasm32"))]
impl GreyCellsSite {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }
}
