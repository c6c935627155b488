use crate::state::SelectionRequest;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::time::Duration;

#[derive(Clone, Debug)]
pub(crate) struct InputEvent {
    pub(crate) key: KeyCode,
    pub(crate) mods: KeyModifiers,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    Select(SelectionRequest),
    ToggleColor,
    Quit,
}

pub(crate) fn collect_input_nonblocking(max_frame_time: Duration) -> anyhow::Result<Vec<InputEvent>> {
    let mut out = Vec::new();

    // poll with a tiny timeout so we stay responsive
    let timeout = std::cmp::min(Duration::from_millis(1), max_frame_time);
    while event::poll(timeout)? {
        if let Event::Key(k) = event::read()? {
            if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat {
                out.push(InputEvent {
                    key: k.code,
                    mods: k.modifiers,
                });
                if out.len() >= 32 {
                    break;
                }
            }
        }
    }
    Ok(out)
}

pub(crate) fn map_event_to_action(ev: &InputEvent) -> Option<Action> {
    // raw mode swallows SIGINT
    if matches!(ev.key, KeyCode::Char('c') | KeyCode::Char('C'))
        && ev.mods.contains(KeyModifiers::CONTROL)
    {
        return Some(Action::Quit);
    }

    match ev.key {
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Action::Quit),
        KeyCode::Char('c') | KeyCode::Char('C') => Some(Action::ToggleColor),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::Select(SelectionRequest::Prev)),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => {
            Some(Action::Select(SelectionRequest::Next))
        }
        KeyCode::Char('0') | KeyCode::Esc => Some(Action::Select(SelectionRequest::Clear)),
        KeyCode::Char(ch @ '1'..='9') => {
            let row = ch as usize - '1' as usize;
            Some(Action::Select(SelectionRequest::Row(row)))
        }
        _ => None,
    }
}
