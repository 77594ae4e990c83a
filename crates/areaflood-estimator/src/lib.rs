//! Flood-fill area estimation over an [`areaflood_core::Grid`].
//!
//! [`AreaEstimator`] counts the cells reachable from the grid's start point
//! through von Neumann neighbors. Default cells are counted and spread the
//! fill; boundary cells are counted but stop it. A final corner pass picks
//! up boundary cells that only touch the interior diagonally.
//!
//! Runs are either immediate (the whole traversal happens inside
//! [`AreaEstimator::run`]) or stepped, where each pending visit is one unit
//! of work drained by [`AreaEstimator::step`] so the caller can draw the grid
//! between units. Both modes visit cells in the same order.
//!
//! Count updates are reported to a [`CountObserver`].

mod estimator;
mod observer;
mod worklist;

pub use estimator::{AreaEstimator, Estimate, EstimateError, EstimatorConfig, RunStatus, Step};
pub use observer::CountObserver;
