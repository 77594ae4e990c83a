use std::fmt;

use areaflood_core::{CellState, Grid, von_neumann};

use crate::observer::CountObserver;
use crate::worklist::{Task, Worklist};

// ---------------------------------------------------------------------------
// Config / results
// ---------------------------------------------------------------------------

/// How an [`AreaEstimator`] runs.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EstimatorConfig {
    /// Schedule each visit as a separate unit drained by
    /// [`AreaEstimator::step`] instead of running to completion in
    /// [`AreaEstimator::run`].
    pub stepped: bool,
}

/// Outcome of a run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Estimate {
    /// Estimated area in cells, the start point included.
    pub total: usize,
    /// Default cells turned into area.
    pub interior: usize,
    /// Boundary cells counted by the flood fill.
    pub boundary: usize,
    /// Boundary cells rescued by the corner pass.
    pub corners: usize,
    /// Visits that got past the counted guard.
    pub visits: usize,
}

/// What [`AreaEstimator::run`] returns.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunStatus {
    /// Stepped mode: work is scheduled, drive it with [`AreaEstimator::step`].
    Pending,
    /// Immediate mode: the run is over.
    Done(Estimate),
}

/// One unit of a stepped run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// A scheduled visit ran. `counted` is false when the cell was skipped
    /// or could not be counted (e.g. the start point).
    Visit {
        index: usize,
        counted: bool,
        total: usize,
    },
    /// The corner pass ran and the run is over.
    Finished(Estimate),
    /// No run in progress.
    Idle,
}

// ---------------------------------------------------------------------------
// AreaEstimator
// ---------------------------------------------------------------------------

/// Flood-fill area estimator bound to one grid.
///
/// The estimator holds a [`Grid`] handle but does not own the cells: the
/// painting side keeps its own handle and may rebuild the grid between runs.
/// A grid is estimated at most once per build; run again after a
/// [`Grid::rebuild`] or [`Grid::reset`].
pub struct AreaEstimator {
    grid: Grid,
    config: EstimatorConfig,
    observer: Option<Box<dyn CountObserver>>,
    worklist: Worklist,
    tally: Estimate,
    running: bool,
    last_generation: Option<u64>,
}

impl AreaEstimator {
    /// Create an immediate-mode estimator over `grid`.
    pub fn new(grid: Grid) -> Self {
        Self::with_config(grid, EstimatorConfig::default())
    }

    pub fn with_config(grid: Grid, config: EstimatorConfig) -> Self {
        Self {
            grid,
            config,
            observer: None,
            worklist: Worklist::default(),
            tally: Estimate::default(),
            running: false,
            last_generation: None,
        }
    }

    /// The grid being estimated.
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn config(&self) -> EstimatorConfig {
        self.config
    }

    /// Select stepped (`true`) or immediate execution for the next run.
    pub fn set_stepped_mode(&mut self, stepped: bool) {
        self.config.stepped = stepped;
    }

    #[inline]
    pub fn is_stepped(&self) -> bool {
        self.config.stepped
    }

    /// Register the observer, replacing any previous one.
    pub fn set_observer(&mut self, observer: impl CountObserver + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    /// Whether a stepped run still has work scheduled.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Running total of the current (or last) run.
    #[inline]
    pub fn total(&self) -> usize {
        self.tally.total
    }

    /// Tally of the current (or last) run.
    #[inline]
    pub fn estimate(&self) -> Estimate {
        self.tally
    }

    /// Visits still queued in a stepped run.
    #[inline]
    pub fn pending(&self) -> usize {
        self.worklist.len()
    }

    /// Start estimating from the grid's start point.
    ///
    /// In immediate mode the traversal and the corner pass finish before
    /// this returns. In stepped mode only the start point's neighbors are
    /// scheduled.
    pub fn run(&mut self) -> Result<RunStatus, EstimateError> {
        if self.running {
            return Err(EstimateError::RunInProgress);
        }
        let generation = self.grid.generation();
        if self.last_generation == Some(generation) {
            log::warn!("estimator: grid generation {generation} was already estimated");
            return Err(EstimateError::AlreadyRun { generation });
        }
        let start = self.grid.start_point().ok_or(EstimateError::NoStartPoint)?;

        log::debug!(
            "estimator: run from cell {start} on {n}x{n} grid ({mode})",
            n = self.grid.size(),
            mode = if self.config.stepped { "stepped" } else { "immediate" },
        );

        self.last_generation = Some(generation);
        self.tally = Estimate {
            total: 1,
            ..Estimate::default()
        };
        self.worklist.seed(&self.grid.neighbors(start));
        self.running = true;

        if self.config.stepped {
            return Ok(RunStatus::Pending);
        }
        Ok(RunStatus::Done(self.drain()))
    }

    /// Run one scheduled unit of a stepped run.
    pub fn step(&mut self) -> Step {
        if !self.running {
            return Step::Idle;
        }
        if self.last_generation != Some(self.grid.generation()) {
            log::debug!(
                "estimator: grid rebuilt mid-run, dropping {} visits",
                self.worklist.len()
            );
            self.worklist.clear();
            self.running = false;
            return Step::Idle;
        }
        match self.worklist.pop() {
            Some(Task::Visit(index)) => {
                let counted = self.visit(index);
                log::trace!("estimator: visit {index} counted={counted}");
                Step::Visit {
                    index,
                    counted,
                    total: self.tally.total,
                }
            }
            Some(Task::Corners) | None => {
                self.correct_corners();
                self.finish_run()
            }
        }
    }

    /// Run whatever is left of a stepped run synchronously.
    ///
    /// Returns `None` if nothing is running.
    pub fn finish(&mut self) -> Option<Estimate> {
        if !self.running {
            return None;
        }
        Some(self.drain())
    }

    /// Drop the remaining work of a stepped run.
    ///
    /// Cells already counted stay counted; the grid must be rebuilt before
    /// it can be estimated again. Returns `false` if nothing was running.
    pub fn cancel(&mut self) -> bool {
        if !self.running {
            return false;
        }
        log::debug!(
            "estimator: cancelled with {} visits pending",
            self.worklist.len()
        );
        self.worklist.clear();
        self.running = false;
        true
    }

    fn drain(&mut self) -> Estimate {
        loop {
            match self.step() {
                Step::Finished(estimate) => return estimate,
                Step::Idle => return self.tally,
                Step::Visit { .. } => {}
            }
        }
    }

    fn finish_run(&mut self) -> Step {
        self.worklist.clear();
        self.running = false;
        let e = self.tally;
        log::info!(
            "estimator: area {} (interior {}, boundary {}, corners {}, start 1)",
            e.total,
            e.interior,
            e.boundary,
            e.corners
        );
        Step::Finished(e)
    }

    fn notify(&mut self) {
        if let Some(observer) = self.observer.as_mut() {
            observer.on_count_updated(self.tally.total);
        }
    }

    /// Visit one cell. Returns whether it was counted.
    fn visit(&mut self, index: usize) -> bool {
        let Some(cell) = self.grid.cell(index) else {
            return false;
        };
        if cell.is_counted() {
            return false;
        }
        // Observers see the total before this cell's contribution.
        self.notify();
        self.tally.visits += 1;

        match cell.state() {
            CellState::Default => {
                if !matches!(self.grid.claim_area(index), Ok(true)) {
                    return false;
                }
                self.tally.total += 1;
                self.tally.interior += 1;
                self.worklist.push_all(&self.grid.neighbors(index));
                true
            }
            CellState::Boundary => {
                if !matches!(self.grid.count_boundary(index), Ok(true)) {
                    return false;
                }
                self.tally.total += 1;
                self.tally.boundary += 1;
                true
            }
            CellState::StartPoint | CellState::Area => false,
        }
    }

    /// Count uncounted boundary cells next to a boundary cell the flood
    /// fill counted.
    ///
    /// Neighbors are judged against the grid as it was before the pass, so
    /// a cell rescued here never rescues another one.
    fn correct_corners(&mut self) {
        let size = self.grid.size();
        let cells = self.grid.cells();
        let counted_boundary = |i: usize| {
            let c = &cells[i];
            c.state() == CellState::Boundary && c.is_counted()
        };
        let rescued: Vec<usize> = cells
            .iter()
            .filter(|c| c.state() == CellState::Boundary && !c.is_counted())
            .map(|c| c.index())
            .filter(|&i| von_neumann(size, i).iter().any(|&n| counted_boundary(n)))
            .collect();

        for index in rescued {
            if !matches!(self.grid.count_boundary(index), Ok(true)) {
                continue;
            }
            self.tally.total += 1;
            self.tally.corners += 1;
            self.notify();
        }
    }
}

impl fmt::Debug for AreaEstimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AreaEstimator")
            .field("grid_size", &self.grid.size())
            .field("config", &self.config)
            .field("observer", &self.observer.is_some())
            .field("tally", &self.tally)
            .field("running", &self.running)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// EstimateError
// ---------------------------------------------------------------------------

/// Reasons [`AreaEstimator::run`] refuses to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EstimateError {
    /// The grid has no start point.
    NoStartPoint,
    /// This grid build was already estimated; rebuild it first.
    AlreadyRun { generation: u64 },
    /// A stepped run is still in progress.
    RunInProgress,
}

impl fmt::Display for EstimateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoStartPoint => write!(f, "estimator: set a start point inside the shape first"),
            Self::AlreadyRun { generation } => write!(
                f,
                "estimator: grid generation {generation} was already estimated; reset the grid to run again"
            ),
            Self::RunInProgress => write!(f, "estimator: a run is already in progress"),
        }
    }
}

impl std::error::Error for EstimateError {}
