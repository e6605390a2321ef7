//! Browser builds. A wasm panic otherwise aborts with nothing in the console.

/// Routes panic messages to `console.error`. Call before the app starts.
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}
