//! Batch helpers around the flock finders.
//!
//! - [`check`]: runs BFE and PFlock on one dataset, then the flock checker.
//! - [`notfound`]: extracts the points of not-found flocks into a dataset.

pub mod check;
pub mod notfound;

pub use check::CheckArgs;
pub use notfound::NotFoundArgs;
