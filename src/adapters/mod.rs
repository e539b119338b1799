//! Adapter implementations of the port traits.
//!
//! `live` talks to the real world (GitHub, the system clock, the disk);
//! `memory` keeps everything in process for tests.

pub mod live;
pub mod memory;
