pub mod deepseek;
pub mod mock;

pub use deepseek::*;
pub use mock::*;
