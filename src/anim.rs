use crate::canvas::Surface;
use crate::host::{FrameToken, Host};
use crate::render::render;
use crate::state::SimulationState;
use tracing::info;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LoopPhase {
    /// Nothing to draw yet.
    Idle,
    /// One frame request always outstanding.
    Running,
    /// Torn down, or the satellite set went empty.
    Stopped,
}

pub(crate) struct AnimationLoop {
    phase: LoopPhase,
    pending: Option<FrameToken>,
    torn_down: bool,
    pub(crate) frames: u64,
}

impl AnimationLoop {
    pub(crate) fn new() -> Self {
        Self {
            phase: LoopPhase::Idle,
            pending: None,
            torn_down: false,
            frames: 0,
        }
    }

    pub(crate) fn phase(&self) -> LoopPhase {
        self.phase
    }

    /// Re-evaluates the phase after the state changed.
    pub(crate) fn sync(&mut self, state: &SimulationState, host: &mut Host) {
        if self.torn_down {
            return;
        }
        match (self.phase, state.is_populated()) {
            (LoopPhase::Idle | LoopPhase::Stopped, true) => {
                self.phase = LoopPhase::Running;
                self.pending = Some(host.request_frame());
                info!(satellites = state.satellites.len(), "animation running");
            }
            (LoopPhase::Running, false) => self.halt(host),
            (LoopPhase::Stopped, false) => self.phase = LoopPhase::Idle,
            _ => {}
        }
    }

    /// Draws one frame and asks for the next. Returns whether it drew.
    pub(crate) fn on_frame<S: Surface + ?Sized>(
        &mut self,
        token: FrameToken,
        state: &SimulationState,
        host: &mut Host,
        now_ms: f64,
        surface: &mut S,
    ) -> bool {
        if self.pending != Some(token) {
            return false;
        }
        self.pending = None;
        if self.phase != LoopPhase::Running {
            return false;
        }
        if !state.is_populated() {
            self.halt(host);
            return false;
        }

        let (w, h) = surface.size();
        let ops = render(state, now_ms, w, h);
        surface.draw(&ops);
        self.frames += 1;
        self.pending = Some(host.request_frame());
        true
    }

    fn halt(&mut self, host: &mut Host) {
        if let Some(token) = self.pending.take() {
            host.cancel_frame(token);
        }
        if self.phase != LoopPhase::Stopped {
            info!(frames = self.frames, "animation stopped");
        }
        self.phase = LoopPhase::Stopped;
    }

    /// Final stop: no phase change after this.
    pub(crate) fn teardown(&mut self, host: &mut Host) {
        self.halt(host);
        self.torn_down = true;
    }
}
