// 核心模块
pub mod cli;
pub mod core;
pub mod environments;
pub mod error;
pub mod infrastructure;
pub mod utils;

// 重新导出常用类型
pub use cli::{Cli, CommandHandler, Commands};
pub use core::RuntimeManager;
pub use environments::*;
pub use error::*;
pub use infrastructure::*;
pub use utils::*;
// 常量使用命名空间导入，避免与模块名冲突
pub use core::constants as app_constants;
