//! The forge asset pipeline
//!
//! Composes the build tasks (styles, plain CSS, scripts, images, vendors,
//! clean), the dev server, and the source watches into explicit task graphs
//! evaluated by a small scheduler.

pub mod graph;
pub mod sources;
pub mod tasks;

pub use graph::{Runner, Step, Task, TaskGraph};
