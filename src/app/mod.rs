pub mod page;
pub mod response;
pub mod server;

pub use server::{build_app_state, build_app_state_with, build_router, AppState};
