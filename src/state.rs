use crate::telemetry::Satellite;
use tracing::debug;

/// Current satellite set plus the selection key.
///
/// `selected_id` is only a lookup key: it is resolved against `satellites`
/// every time it is read, so a set without that id reads as "nothing
/// selected" until the id comes back.
#[derive(Clone, Debug, Default)]
pub(crate) struct SimulationState {
    pub(crate) satellites: Vec<Satellite>,
    pub(crate) selected_id: Option<u32>,
}

impl SimulationState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Swaps in a freshly generated set in one assignment. An unset
    /// selection defaults to the first satellite of the new set.
    pub(crate) fn replace_satellites(&mut self, set: Vec<Satellite>) {
        self.satellites = set;
        if self.selected_id.is_none() {
            self.selected_id = self.satellites.first().map(|s| s.id);
        }
    }

    pub(crate) fn is_populated(&self) -> bool {
        !self.satellites.is_empty()
    }

    pub(crate) fn selected(&self) -> Option<&Satellite> {
        let id = self.selected_id?;
        self.satellites.iter().find(|s| s.id == id)
    }

    pub(crate) fn is_selected(&self, sat: &Satellite) -> bool {
        self.selected().is_some_and(|s| s.id == sat.id)
    }

    fn selected_index(&self) -> Option<usize> {
        let id = self.selected_id?;
        self.satellites.iter().position(|s| s.id == id)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SelectionRequest {
    Id(u32),
    Row(usize),
    Next,
    Prev,
    Clear,
}

/// Applies selection requests. Only ever rewrites `selected_id`.
#[derive(Default)]
pub(crate) struct SelectionController;

impl SelectionController {
    /// Any id is accepted; membership is checked when the selection is read.
    pub(crate) fn select(&self, state: &mut SimulationState, id: u32) {
        if state.selected_id != Some(id) {
            debug!(from = ?state.selected_id, to = id, "selection changed");
        }
        state.selected_id = Some(id);
    }

    pub(crate) fn apply(&self, state: &mut SimulationState, req: SelectionRequest) {
        let n = state.satellites.len();
        match req {
            SelectionRequest::Id(id) => self.select(state, id),
            SelectionRequest::Row(row) => {
                if let Some(id) = state.satellites.get(row).map(|s| s.id) {
                    self.select(state, id);
                }
            }
            SelectionRequest::Next | SelectionRequest::Prev if n == 0 => {}
            SelectionRequest::Next => {
                let row = state.selected_index().map_or(0, |i| (i + 1) % n);
                let id = state.satellites[row].id;
                self.select(state, id);
            }
            SelectionRequest::Prev => {
                let row = state.selected_index().map_or(0, |i| (i + n - 1) % n);
                let id = state.satellites[row].id;
                self.select(state, id);
            }
            SelectionRequest::Clear => {
                if state.selected_id.take().is_some() {
                    debug!("selection cleared");
                }
            }
        }
    }
}
