use crate::catalog::CatalogEntry;
use crate::host::{Host, TimerToken};
use crate::state::SimulationState;
use crate::telemetry::{generate_all, UniformSource};
use tracing::{debug, info, warn};

/// Periodically rebuilds the satellite set and swaps it into the state.
pub(crate) struct RegenerationScheduler {
    catalog: &'static [CatalogEntry],
    period_ms: f64,
    timer: Option<TimerToken>,
    pub(crate) ticks: u64,
    pub(crate) failures: u64,
}

impl RegenerationScheduler {
    pub(crate) fn new(catalog: &'static [CatalogEntry], period_ms: u64) -> Self {
        Self {
            catalog,
            period_ms: period_ms as f64,
            timer: None,
            ticks: 0,
            failures: 0,
        }
    }

    /// Runs the first tick right away, then arms the periodic timer.
    pub(crate) fn start<S: UniformSource + ?Sized>(
        &mut self,
        host: &mut Host,
        now_ms: f64,
        state: &mut SimulationState,
        source: &mut S,
    ) {
        if self.timer.is_some() {
            return;
        }
        self.tick(now_ms, state, source);
        self.timer = Some(host.set_interval(now_ms, self.period_ms));
        info!(period_ms = self.period_ms, "regeneration started");
    }

    pub(crate) fn owns(&self, token: TimerToken) -> bool {
        self.timer == Some(token)
    }

    #[cfg(test)]
    pub(crate) fn is_active(&self) -> bool {
        self.timer.is_some()
    }

    /// A failed tick leaves the previous set in place; the next period is
    /// the retry.
    pub(crate) fn tick<S: UniformSource + ?Sized>(
        &mut self,
        now_ms: f64,
        state: &mut SimulationState,
        source: &mut S,
    ) -> bool {
        match generate_all(self.catalog, now_ms, source) {
            Ok(set) => {
                state.replace_satellites(set);
                self.ticks += 1;
                debug!(tick = self.ticks, count = state.satellites.len(), "satellite set replaced");
                true
            }
            Err(e) => {
                self.failures += 1;
                warn!(error = %e, kept = state.satellites.len(), "telemetry tick skipped");
                false
            }
        }
    }

    pub(crate) fn stop(&mut self, host: &mut Host) {
        if let Some(token) = self.timer.take() {
            host.clear_interval(token);
            info!(ticks = self.ticks, failures = self.failures, "regeneration stopped");
        }
    }
}
