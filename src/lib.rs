//! Greeting card core crate.
//!
//! A single animated greeting page: typed message, delayed reveal, a
//! self-expiring confetti celebration and floating petals. The timelines live in
//! plain Rust ([`page`], [`typing`], [`reveal`], [`celebration`]) behind the
//! [`host::Host`] capability so they run natively under test; [`browser`] and
//! [`dom`] bind them to a real window.

use wasm_bindgen::prelude::*;

pub mod animation;
mod app;
pub mod browser;
pub mod celebration;
pub mod config;
pub mod confetti;
pub mod dom;
pub mod error;
pub mod host;
pub mod page;
pub mod petals;
pub mod reveal;
pub mod rng;
pub mod typing;
pub mod viewport;

pub use config::GreetingConfig;
pub use error::GreetingError;
pub use host::{Host, ManualHost, Viewport};
pub use page::{GreetingPage, PageSnapshot, View};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    // Ignore if a logger is already installed.
    #[cfg(target_arch = "wasm32")]
    let _ = console_log::init_with_level(log::Level::Debug);
}

// -----------------------------------------------------------------------------
// JS entrypoints
// -----------------------------------------------------------------------------

#[wasm_bindgen]
pub fn start_greeting() -> Result<(), JsValue> {
    app::start().map_err(JsValue::from)
}

#[wasm_bindgen]
pub fn stop_greeting() {
    app::stop();
}

#[wasm_bindgen]
pub fn launch_celebration() {
    app::launch_celebration();
}

#[wasm_bindgen]
pub fn open_surprise() {
    app::open_surprise();
}
