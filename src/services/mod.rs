pub mod allocator;
pub mod solver;
pub mod venue;

pub use allocator::{Allocation, PartialRun, Strategy};
pub use solver::{solve, Overflow, RunHistogram, Selection};
