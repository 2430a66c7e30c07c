//! CLI commands implementation

pub mod chat;
pub mod embed;
pub mod init;
pub mod load;
pub mod search;
pub mod status;

pub use chat::*;
pub use embed::*;
pub use init::*;
pub use load::*;
pub use search::*;
pub use status::*;
