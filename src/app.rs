use crate::canvas::PixelCanvas;
use crate::config::{load_settings, project_paths, Cli, Settings};
use crate::host::{now_ms, Host, TimerToken};
use crate::input::{collect_input_nonblocking, map_event_to_action, Action};
use crate::logging;
use crate::panel::{draw_panel, format_clock, panel_lines};
use crate::state::SelectionRequest;
use crate::term::{canvas_to_cells, Terminal};
use crate::tracker::Tracker;
use crossterm::style::Color;
use rand::{rngs::StdRng, SeedableRng};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub(crate) struct App {
    settings: Settings,
    term: Terminal,
    canvas: PixelCanvas,
    host: Host,
    tracker: Tracker,
    rng: StdRng,
    clock_timer: TimerToken,
    clock_text: String,
    should_quit: bool,
}

/// Columns left for the orbit view once the panel is carved off the right.
fn split_columns(cols: u16, panel_width: u16) -> (u16, u16) {
    let panel = panel_width.min(cols / 2);
    (cols - panel, panel)
}

impl App {
    fn init(settings: Settings) -> anyhow::Result<Self> {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut host = Host::new();
        let clock_timer = host.set_interval(now_ms(), settings.clock_period_ms as f64);
        let tracker = Tracker::new(settings.regen_period_ms);

        let term = Terminal::begin()?;
        let (view_cols, _) = split_columns(term.cols, settings.panel_width);
        let canvas = PixelCanvas::new(view_cols as u32 * 2, term.rows as u32 * 4);

        Ok(Self {
            settings,
            term,
            canvas,
            host,
            tracker,
            rng,
            clock_timer,
            clock_text: format_clock(chrono::Utc::now()),
            should_quit: false,
        })
    }

    fn relayout(&mut self) {
        let (view_cols, _) = split_columns(self.term.cols, self.settings.panel_width);
        self.canvas = PixelCanvas::new(view_cols as u32 * 2, self.term.rows as u32 * 4);
        debug!(
            cols = self.term.cols,
            rows = self.term.rows,
            canvas_w = self.canvas.w,
            canvas_h = self.canvas.h,
            "relayout"
        );
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let fps = self.settings.fps();
        let frame_dt = Duration::from_secs_f32(1.0 / fps as f32);
        info!(fps, seed = ?self.settings.seed, "starting");

        self.tracker.mount(&mut self.host, now_ms(), &mut self.rng);
        if let Some(id) = self.settings.initial_selection {
            let select = Action::Select(SelectionRequest::Id(id));
            apply_actions([select], &mut self.settings, &mut self.tracker);
        }

        while !self.should_quit {
            let frame_start = Instant::now();

            if self.term.resize_if_needed()? {
                self.relayout();
            }

            let events = collect_input_nonblocking(frame_dt)?;
            let actions = events.iter().filter_map(map_event_to_action);
            if apply_actions(actions, &mut self.settings, &mut self.tracker) {
                // teardown runs next, no further poll or frame
                self.should_quit = true;
                break;
            }

            let now = now_ms();
            for token in self.host.poll(now) {
                if token == self.clock_timer {
                    self.clock_text = format_clock(chrono::Utc::now());
                } else if !self.tracker.on_timer(token, &mut self.host, now, &mut self.rng) {
                    warn!(?token, "timer with no owner");
                }
            }
            for token in self.host.take_frames() {
                self.tracker.on_frame(token, &mut self.host, now, &mut self.canvas);
            }

            self.render_frame()?;

            // frame cap
            spin_sleep(frame_dt, frame_start);
        }

        Ok(())
    }

    fn render_frame(&mut self) -> anyhow::Result<()> {
        let bg = Color::Black;
        self.term.cur.clear(bg);

        canvas_to_cells(&self.canvas, &mut self.term.cur, self.settings.enable_color, bg);

        let (view_cols, panel_cols) = split_columns(self.term.cols, self.settings.panel_width);
        if panel_cols > 2 {
            let lines = panel_lines(
                self.tracker.state(),
                &self.clock_text,
                self.settings.regen_period_ms,
                (panel_cols - 3) as usize,
            );
            draw_panel(&mut self.term.cur, view_cols, &lines, self.settings.enable_color);
        }

        self.term.present()
    }

    fn shutdown(&mut self) {
        if self.tracker.is_mounted() {
            self.tracker.teardown(&mut self.host);
        }
        self.host.clear_interval(self.clock_timer);
        info!(
            frames = self.tracker.frames(),
            phase = ?self.tracker.phase(),
            idle = self.host.is_idle(),
            "stopped"
        );
    }
}

/// Applies key actions in order. Returns true once a quit is seen;
/// anything after it is dropped.
fn apply_actions(actions: impl IntoIterator<Item = Action>, settings: &mut Settings, tracker: &mut Tracker) -> bool {
    for action in actions {
        match action {
            Action::Quit => return true,
            Action::ToggleColor => settings.enable_color = !settings.enable_color,
            Action::Select(req) => tracker.select(req),
        }
    }
    false
}

pub(crate) fn run(cli: Cli) -> anyhow::Result<()> {
    let paths = project_paths()?;

    let log_path = cli.log_file.clone().unwrap_or(paths.log_path);
    if let Err(e) = logging::init(&log_path) {
        eprintln!("logging disabled: {e:#}");
    }

    let settings_path = cli.settings.clone().unwrap_or(paths.settings_path);
    let settings = load_settings(&settings_path).merge_cli(&cli);

    let mut app = App::init(settings)?;
    let result = app.run();
    app.shutdown();
    // restore the terminal even when the loop failed
    let restored = app.term.end();
    result?;
    restored
}

/* -----------------------------
   Frame pacing helper
------------------------------ */

fn spin_sleep(target: Duration, start: Instant) {
    let end = start + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        let left = end - t;
        if left > Duration::from_millis(2) {
            std::thread::sleep(left - Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}
