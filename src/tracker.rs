use crate::anim::{AnimationLoop, LoopPhase};
use crate::canvas::Surface;
use crate::catalog::CATALOG;
use crate::host::{FrameToken, Host, TimerToken};
use crate::regen::RegenerationScheduler;
use crate::state::{SelectionController, SelectionRequest, SimulationState};
use crate::telemetry::UniformSource;
use tracing::info;

/// Owns the simulation state and the two schedules that drive it.
///
/// Mounting runs the first regeneration and starts the animation once
/// there is something to draw; teardown cancels both schedules, after
/// which every callback is a no-op.
pub(crate) struct Tracker {
    state: SimulationState,
    selection: SelectionController,
    regen: RegenerationScheduler,
    anim: AnimationLoop,
    mounted: bool,
    torn_down: bool,
}

impl Tracker {
    pub(crate) fn new(regen_period_ms: u64) -> Self {
        Self {
            state: SimulationState::new(),
            selection: SelectionController,
            regen: RegenerationScheduler::new(&CATALOG, regen_period_ms),
            anim: AnimationLoop::new(),
            mounted: false,
            torn_down: false,
        }
    }

    pub(crate) fn state(&self) -> &SimulationState {
        &self.state
    }

    pub(crate) fn phase(&self) -> LoopPhase {
        self.anim.phase()
    }

    pub(crate) fn frames(&self) -> u64 {
        self.anim.frames
    }

    pub(crate) fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub(crate) fn mount<S: UniformSource + ?Sized>(&mut self, host: &mut Host, now_ms: f64, source: &mut S) {
        // a torn-down tracker never comes back
        if self.mounted || self.torn_down {
            return;
        }
        self.mounted = true;
        info!(catalog = CATALOG.len(), "tracker mounted");
        self.regen.start(host, now_ms, &mut self.state, source);
        self.anim.sync(&self.state, host);
    }

    /// Returns false for timers this tracker does not own.
    pub(crate) fn on_timer<S: UniformSource + ?Sized>(
        &mut self,
        token: TimerToken,
        host: &mut Host,
        now_ms: f64,
        source: &mut S,
    ) -> bool {
        if !self.mounted || !self.regen.owns(token) {
            return false;
        }
        self.regen.tick(now_ms, &mut self.state, source);
        self.anim.sync(&self.state, host);
        true
    }

    pub(crate) fn on_frame<S: Surface + ?Sized>(
        &mut self,
        token: FrameToken,
        host: &mut Host,
        now_ms: f64,
        surface: &mut S,
    ) -> bool {
        if !self.mounted {
            return false;
        }
        self.anim.on_frame(token, &self.state, host, now_ms, surface)
    }

    pub(crate) fn select(&mut self, req: SelectionRequest) {
        if self.mounted {
            self.selection.apply(&mut self.state, req);
        }
    }

    pub(crate) fn teardown(&mut self, host: &mut Host) {
        if !self.mounted {
            return;
        }
        self.regen.stop(host);
        self.anim.teardown(host);
        self.mounted = false;
        self.torn_down = true;
        info!(frames = self.anim.frames, ticks = self.regen.ticks, "tracker torn down");
    }
}
