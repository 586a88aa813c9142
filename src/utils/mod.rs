pub mod buffer;
pub mod panic;
