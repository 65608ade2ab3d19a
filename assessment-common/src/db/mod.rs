//! Result persistence

pub mod init;
pub mod results;

pub use init::*;
pub use results::ResultStore;
