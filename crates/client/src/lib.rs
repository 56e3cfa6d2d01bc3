//! Headless client that plays a full battlefield match.
//!
//! The binary is the composition root: it reads [`ClientConfig`] from the
//! environment, installs logging, builds the [`runtime::Runtime`] with a
//! decision provider, and auto-plays until a team wins or the round limit is
//! reached.

pub mod config;
pub mod logging;

pub use config::ClientConfig;
