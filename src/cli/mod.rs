mod root;
pub use root::{parse, Command, EventgateCommand};

pub mod discover;
pub mod session;
