pub mod annotations;
pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod git;
pub mod github;
pub mod io;
pub mod reconcile;
pub mod reference;
pub mod release;
pub mod scan;
pub mod summary;
pub mod updater;

pub use error::{Result, UpdaterError};
