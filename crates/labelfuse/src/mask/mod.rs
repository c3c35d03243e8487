//! Per-hypothesis binary masks: foreground and label-transition boundaries.

mod boundary;
mod foreground;

pub use boundary::boundary_mask;
pub use foreground::foreground_mask;

pub(crate) use boundary::mark_boundaries;
pub(crate) use foreground::max_foreground_into;
