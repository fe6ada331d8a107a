pub mod constants;
pub mod runtime_manager;

pub use runtime_manager::RuntimeManager;
