pub mod app_state;
pub mod config;
pub mod handlers;
pub mod router;
pub mod rpc;
pub mod session;
