//! Location of the persisted client state.
//!
//! Responsibilities:
//! - Resolve the platform-standard path of the state file that holds the
//!   serialized user record and the CSRF token between runs.
//!
//! Does NOT handle:
//! - Reading or writing the state file (see the client crate's `FileStore`).

mod path;

pub use path::default_state_path;
