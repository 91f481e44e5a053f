pub mod catalog;
pub mod chat;
pub mod intent;

pub use catalog::*;
pub use chat::*;
pub use intent::*;
