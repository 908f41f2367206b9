pub mod registry;
pub mod traits;

// API provider implementations
pub mod frankfurter;
pub mod synthetic;
#[cfg(not(target_arch = "wasm32"))]
pub mod yahoo_finance;
