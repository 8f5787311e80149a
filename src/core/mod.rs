//! File system and environment abstractions.
//!
//! The CSV facade never touches `std::fs` directly: files are opened through a
//! [`FileSystem`](file_system::FileSystem) and relative paths are resolved
//! against the working directory reported by an
//! [`Environment`](environment::Environment). A [`Context`](context::Context)
//! bundles both, the same way a build script receives them from its host.

pub mod context;

pub mod environment;

pub mod file_system;

pub mod path;
