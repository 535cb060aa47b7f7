// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod clock;
pub mod icon;
pub mod input;
pub mod menu;
pub mod recent;
pub mod render;
pub mod runtime;
pub mod session;
pub mod store;
pub mod timer;
