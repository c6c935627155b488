use crate::state::SimulationState;
use crate::telemetry::Satellite;

/* -----------------------------
   Draw operations
------------------------------ */

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Rgba {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: f64,
}

const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Rgba {
    Rgba { r, g, b, a }
}

const fn hex(v: u32) -> Rgba {
    rgba((v >> 16) as u8, (v >> 8) as u8, v as u8, 1.0)
}

impl Rgba {
    pub(crate) fn with_alpha(self, a: f64) -> Rgba {
        Rgba { a, ..self }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ColorStop {
    pub(crate) offset: f64,
    pub(crate) color: Rgba,
}

/// Two-circle radial gradient, same model as an HTML canvas gradient.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RadialGradient {
    pub(crate) x0: f64,
    pub(crate) y0: f64,
    pub(crate) r0: f64,
    pub(crate) x1: f64,
    pub(crate) y1: f64,
    pub(crate) r1: f64,
    pub(crate) stops: Vec<ColorStop>,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Paint {
    Solid(Rgba),
    Radial(RadialGradient),
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum DrawOp {
    FillRect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        color: Rgba,
    },
    FillCircle {
        cx: f64,
        cy: f64,
        r: f64,
        paint: Paint,
    },
    StrokeCircle {
        cx: f64,
        cy: f64,
        r: f64,
        width: f64,
        color: Rgba,
        dash: Option<[f64; 2]>,
    },
}

/* -----------------------------
   Scene constants (800x600 reference canvas)
------------------------------ */

pub(crate) const REF_WIDTH: f64 = 800.0;
pub(crate) const REF_HEIGHT: f64 = 600.0;
pub(crate) const EARTH_RADIUS: f64 = 120.0;
pub(crate) const STAR_COUNT: usize = 100;
pub(crate) const PING_RINGS: usize = 3;
pub(crate) const PING_PERIOD_MS: f64 = 1_000.0;
pub(crate) const PING_MAX_RADIUS: f64 = 20.0;
const GRID_RINGS: usize = 8;
const GLOW_RADIUS: f64 = 15.0;
const MARKER_RADIUS: f64 = 4.0;
const ORBIT_DASH: f64 = 5.0;

const TRAIL_FADE: Rgba = rgba(5, 8, 20, 0.2);
const HALO: Rgba = rgba(59, 130, 246, 0.3);
const EARTH_LIGHT: Rgba = hex(0x4facfe);
const EARTH_MID: Rgba = hex(0x2563eb);
const EARTH_DARK: Rgba = hex(0x1e40af);
const GRID: Rgba = rgba(255, 255, 255, 0.1);
const ORBIT_SELECTED: Rgba = rgba(34, 197, 94, 0.4);
const ORBIT_OTHER: Rgba = rgba(100, 116, 139, 0.2);
const GLOW_SELECTED: Rgba = rgba(34, 197, 94, 0.8);
const GLOW_OTHER: Rgba = rgba(59, 130, 246, 0.6);
const GLOW_EDGE: Rgba = rgba(34, 197, 94, 0.0);
const MARKER_SELECTED: Rgba = hex(0x22c55e);
const MARKER_OTHER: Rgba = hex(0x3b82f6);
const PING: Rgba = rgba(34, 197, 94, 0.5);
const STAR: Rgba = rgba(255, 255, 255, 0.8);

/// Canvas center and the factor mapping reference pixels to canvas pixels.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Geometry {
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) cx: f64,
    pub(crate) cy: f64,
    pub(crate) scale: f64,
}

impl Geometry {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        let (w, h) = (width as f64, height as f64);
        Self {
            width: w,
            height: h,
            cx: w / 2.0,
            cy: h / 2.0,
            scale: (w / REF_WIDTH).min(h / REF_HEIGHT),
        }
    }

    pub(crate) fn earth_radius(&self) -> f64 {
        EARTH_RADIUS * self.scale
    }

    fn px(&self, v: f64) -> f64 {
        v * self.scale
    }

    fn line(&self, v: f64) -> f64 {
        self.px(v).max(1.0)
    }
}

/// Flat circular approximation: altitude widens the ring, no projection.
pub(crate) fn orbit_radius(earth_radius: f64, altitude_km: f64, scale: f64) -> f64 {
    earth_radius + altitude_km / 5.0 * scale
}

pub(crate) fn screen_position(geo: &Geometry, sat: &Satellite) -> (f64, f64) {
    let r = orbit_radius(geo.earth_radius(), sat.altitude, geo.scale);
    let a = sat.orbit_angle.to_radians();
    (geo.cx + a.cos() * r, geo.cy + a.sin() * r)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct PingRing {
    pub(crate) radius: f64, // reference px
    pub(crate) alpha: f64,
}

pub(crate) fn ping_rings(now_ms: f64) -> [PingRing; PING_RINGS] {
    let cycle = now_ms / PING_PERIOD_MS;
    std::array::from_fn(|k| {
        let phase = (cycle + k as f64 / 6.0).rem_euclid(1.0);
        let radius = phase * PING_MAX_RADIUS;
        PingRing {
            radius,
            alpha: PING.a - radius / (2.0 * PING_MAX_RADIUS),
        }
    })
}

/// Fixed star positions: depend on index and canvas size only.
pub(crate) fn stars(width: f64, height: f64) -> impl Iterator<Item = (f64, f64, f64)> {
    (0..STAR_COUNT).map(move |i| {
        let x = (i as f64 * 137.508) % width;
        let y = (i as f64 * 197.508) % height;
        let size = (i % 3) as f64 / 2.0;
        (x, y, size)
    })
}

/* -----------------------------
   Frame pipeline
------------------------------ */

pub(crate) fn render(state: &SimulationState, now_ms: f64, width: u32, height: u32) -> Vec<DrawOp> {
    let geo = Geometry::new(width, height);
    let earth_r = geo.earth_radius();
    let mut ops = Vec::with_capacity(16 + state.satellites.len() * 6 + STAR_COUNT);

    // fade instead of clear, so moving markers leave a trail
    ops.push(DrawOp::FillRect {
        x: 0.0,
        y: 0.0,
        w: geo.width,
        h: geo.height,
        color: TRAIL_FADE,
    });

    ops.push(DrawOp::FillCircle {
        cx: geo.cx,
        cy: geo.cy,
        r: earth_r * 1.5,
        paint: Paint::Radial(RadialGradient {
            x0: geo.cx,
            y0: geo.cy,
            r0: earth_r * 0.8,
            x1: geo.cx,
            y1: geo.cy,
            r1: earth_r * 1.5,
            stops: vec![
                ColorStop { offset: 0.0, color: HALO },
                ColorStop { offset: 1.0, color: HALO.with_alpha(0.0) },
            ],
        }),
    });

    ops.push(DrawOp::FillCircle {
        cx: geo.cx,
        cy: geo.cy,
        r: earth_r,
        paint: Paint::Radial(RadialGradient {
            x0: geo.cx - geo.px(30.0),
            y0: geo.cy - geo.px(30.0),
            r0: geo.px(20.0),
            x1: geo.cx,
            y1: geo.cy,
            r1: earth_r,
            stops: vec![
                ColorStop { offset: 0.0, color: EARTH_LIGHT },
                ColorStop { offset: 0.5, color: EARTH_MID },
                ColorStop { offset: 1.0, color: EARTH_DARK },
            ],
        }),
    });

    for i in 0..GRID_RINGS {
        ops.push(DrawOp::StrokeCircle {
            cx: geo.cx,
            cy: geo.cy,
            r: earth_r * (i + 1) as f64 / GRID_RINGS as f64,
            width: geo.line(1.0),
            color: GRID,
            dash: None,
        });
    }

    for sat in &state.satellites {
        let selected = state.is_selected(sat);
        push_satellite(&mut ops, &geo, sat, selected, now_ms);
    }

    for (x, y, size) in stars(geo.width, geo.height) {
        ops.push(DrawOp::FillRect {
            x,
            y,
            w: size,
            h: size,
            color: STAR,
        });
    }

    ops
}

fn push_satellite(ops: &mut Vec<DrawOp>, geo: &Geometry, sat: &Satellite, selected: bool, now_ms: f64) {
    let orbit_r = orbit_radius(geo.earth_radius(), sat.altitude, geo.scale);
    let (x, y) = screen_position(geo, sat);
    let dash = geo.px(ORBIT_DASH).max(1.0);

    ops.push(DrawOp::StrokeCircle {
        cx: geo.cx,
        cy: geo.cy,
        r: orbit_r,
        width: geo.line(1.0),
        color: if selected { ORBIT_SELECTED } else { ORBIT_OTHER },
        dash: Some([dash, dash]),
    });

    ops.push(DrawOp::FillCircle {
        cx: x,
        cy: y,
        r: geo.px(GLOW_RADIUS),
        paint: Paint::Radial(RadialGradient {
            x0: x,
            y0: y,
            r0: 0.0,
            x1: x,
            y1: y,
            r1: geo.px(GLOW_RADIUS),
            stops: vec![
                ColorStop {
                    offset: 0.0,
                    color: if selected { GLOW_SELECTED } else { GLOW_OTHER },
                },
                ColorStop { offset: 1.0, color: GLOW_EDGE },
            ],
        }),
    });

    ops.push(DrawOp::FillCircle {
        cx: x,
        cy: y,
        r: geo.px(MARKER_RADIUS),
        paint: Paint::Solid(if selected { MARKER_SELECTED } else { MARKER_OTHER }),
    });

    if selected {
        for ring in ping_rings(now_ms) {
            ops.push(DrawOp::StrokeCircle {
                cx: x,
                cy: y,
                r: geo.px(ring.radius),
                width: geo.line(2.0),
                color: PING.with_alpha(ring.alpha),
                dash: None,
            });
        }
    }
}
