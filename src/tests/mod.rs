pub mod common;
mod concurrent_access;
mod config_loading;
