pub mod plan_task;
pub mod protocol;
pub mod rest;
pub mod state;

// Re-export the handler and router builder to make them easily accessible
// to the binary that will build the web server.
pub use rest::{build_router, generate_handler};
