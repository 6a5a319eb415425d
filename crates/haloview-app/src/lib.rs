//! Halo viewer application shell.
//!
//! Provides window creation, event handling, and the frame loop.

pub mod frame_loop;
pub mod window;
