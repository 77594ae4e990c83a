/// Receives the running total while an estimate is in progress.
///
/// Called once per visit that passes the counted guard, with the total as it
/// was *before* that cell's contribution, and once per cell rescued by the
/// corner pass, with the total after it.
pub trait CountObserver {
    fn on_count_updated(&mut self, total: usize);
}

impl<F: FnMut(usize)> CountObserver for F {
    #[inline]
    fn on_count_updated(&mut self, total: usize) {
        self(total)
    }
}
