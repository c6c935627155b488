use crate::state::SimulationState;
use crate::telemetry::Satellite;
use crate::term::{draw_text, Cell, CellBuffer};
use chrono::{DateTime, Utc};
use crossterm::style::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Tone {
    Title,
    Text,
    Dim,
    Active,
    Value,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PanelLine {
    pub(crate) text: String,
    pub(crate) tone: Tone,
}

impl PanelLine {
    fn new(tone: Tone, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }

    fn blank() -> Self {
        Self::new(Tone::Text, "")
    }
}

pub(crate) fn format_clock(t: DateTime<Utc>) -> String {
    t.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Label/value pairs shown for the selected satellite.
pub(crate) fn telemetry_rows(sat: &Satellite) -> [(&'static str, String); 4] {
    [
        ("Latitude", format!("{:.4}°", sat.latitude)),
        ("Longitude", format!("{:.4}°", sat.longitude)),
        ("Altitude", format!("{:.2} km", sat.altitude)),
        ("Velocity", format!("{:.2} km/s", sat.velocity)),
    ]
}

/// Milliseconds as seconds, without trailing zeros: 5000 -> "5", 250 -> "0.25".
fn format_seconds(ms: u64) -> String {
    if ms % 1000 == 0 {
        return (ms / 1000).to_string();
    }
    let s = format!("{}.{:03}", ms / 1000, ms % 1000);
    s.trim_end_matches('0').to_string()
}

fn row(label: &str, value: &str, width: usize) -> String {
    let pad = width.saturating_sub(label.chars().count() + value.chars().count()).max(1);
    format!("{label}{}{value}", " ".repeat(pad))
}

pub(crate) fn panel_lines(state: &SimulationState, clock: &str, regen_period_ms: u64, width: usize) -> Vec<PanelLine> {
    let mut lines = vec![
        PanelLine::new(Tone::Title, "Live Satellite Tracker"),
        PanelLine::new(Tone::Dim, clock),
        PanelLine::blank(),
    ];

    if !state.is_populated() {
        lines.push(PanelLine::new(Tone::Dim, "Acquiring satellite data…"));
        return lines;
    }

    lines.push(PanelLine::new(Tone::Title, "Active Satellites"));
    for (i, sat) in state.satellites.iter().enumerate() {
        let selected = state.is_selected(sat);
        let (mark, tone) = if selected { ('●', Tone::Active) } else { ('○', Tone::Text) };
        lines.push(PanelLine::new(tone, format!("{} {} {}", i + 1, mark, sat.name)));
        lines.push(PanelLine::new(Tone::Dim, format!("      ID: {}", sat.id)));
    }

    if let Some(sat) = state.selected() {
        lines.push(PanelLine::blank());
        lines.push(PanelLine::new(Tone::Title, "Telemetry Data"));
        for (label, value) in telemetry_rows(sat) {
            lines.push(PanelLine::new(Tone::Value, row(label, &value, width)));
        }
    }

    lines.push(PanelLine::blank());
    lines.push(PanelLine::new(
        Tone::Dim,
        format!("Tracking {} satellites", state.satellites.len()),
    ));
    lines.push(PanelLine::new(
        Tone::Dim,
        format!("Data updates every {} seconds", format_seconds(regen_period_ms)),
    ));
    lines
}

const KEYS_HELP: &str = "↑↓ select | 1-4 pick | 0 clear | c colour | q quit";

fn tone_color(tone: Tone, enable_color: bool) -> (Color, bool) {
    if !enable_color {
        return (Color::White, matches!(tone, Tone::Title | Tone::Active));
    }
    match tone {
        Tone::Title => (Color::Rgb { r: 96, g: 165, b: 250 }, true),
        Tone::Text => (Color::Rgb { r: 220, g: 220, b: 230 }, false),
        Tone::Dim => (Color::Rgb { r: 148, g: 163, b: 184 }, false),
        Tone::Active => (Color::Rgb { r: 34, g: 197, b: 94 }, true),
        Tone::Value => (Color::Rgb { r: 226, g: 232, b: 240 }, false),
    }
}

/// Draws the panel in columns `x0..buf.w`, with a divider at `x0`.
pub(crate) fn draw_panel(buf: &mut CellBuffer, x0: u16, lines: &[PanelLine], enable_color: bool) {
    let bg = Color::Black;
    let edge = if enable_color {
        Color::Rgb { r: 80, g: 95, b: 120 }
    } else {
        Color::DarkGrey
    };
    for y in 0..buf.h {
        buf.set(
            x0,
            y,
            Cell {
                ch: '│',
                fg: edge,
                bg,
                bold: false,
            },
        );
    }

    let tx = x0.saturating_add(2);
    let bottom = buf.h.saturating_sub(2);
    for (i, line) in lines.iter().enumerate() {
        let y = 1 + i as u16;
        if y >= bottom {
            break;
        }
        let (fg, bold) = tone_color(line.tone, enable_color);
        draw_text(buf, tx, y, &line.text, fg, bg, bold);
    }

    let (fg, _) = tone_color(Tone::Dim, enable_color);
    draw_text(buf, tx, buf.h.saturating_sub(1), KEYS_HELP, fg, bg, false);
}
