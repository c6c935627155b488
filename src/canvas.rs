use crate::render::{ColorStop, DrawOp, Paint, RadialGradient, Rgba};
use std::f64::consts::TAU;

/// Anything the frame pipeline can draw into.
pub(crate) trait Surface {
    fn size(&self) -> (u32, u32);
    fn draw(&mut self, ops: &[DrawOp]);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Pixel {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

pub(crate) const BACKDROP: Pixel = Pixel {
    r: 5,
    g: 8,
    b: 20,
    a: 255,
};

/// RGBA pixels kept between frames; the trail fade relies on that.
pub(crate) struct PixelCanvas {
    pub(crate) w: u32,
    pub(crate) h: u32,
    pub(crate) px: Vec<Pixel>,
}

impl PixelCanvas {
    pub(crate) fn new(w: u32, h: u32) -> Self {
        Self {
            w,
            h,
            px: vec![BACKDROP; (w as usize) * (h as usize)],
        }
    }

    pub(crate) fn idx(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }

    pub(crate) fn get(&self, x: u32, y: u32) -> Option<Pixel> {
        (x < self.w && y < self.h).then(|| self.px[self.idx(x, y)])
    }

    fn blend_over(&mut self, x: i64, y: i64, src: Rgba, coverage: f64) {
        if x < 0 || y < 0 || x >= self.w as i64 || y >= self.h as i64 {
            return;
        }
        let sa = (src.a * coverage).clamp(0.0, 1.0);
        if sa <= 1e-6 {
            return;
        }
        let i = self.idx(x as u32, y as u32);
        let dst = self.px[i];
        let da = dst.a as f64 / 255.0;

        let out_a = sa + da * (1.0 - sa);
        let blend = |sc: u8, dc: u8| -> u8 {
            let sc = sc as f64 / 255.0;
            let dc = dc as f64 / 255.0;
            let out = (sc * sa + dc * da * (1.0 - sa)) / out_a;
            (out.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
        };

        self.px[i] = Pixel {
            r: blend(src.r, dst.r),
            g: blend(src.g, dst.g),
            b: blend(src.b, dst.b),
            a: (out_a.clamp(0.0, 1.0) * 255.0 + 0.5) as u8,
        };
    }

    /// Pixels partially covered by the rectangle get proportional alpha.
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgba) {
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let (x1, y1) = (x + w, y + h);
        for py in y.floor() as i64..y1.ceil() as i64 {
            let oy = (y1.min(py as f64 + 1.0) - y.max(py as f64)).max(0.0);
            for px in x.floor() as i64..x1.ceil() as i64 {
                let ox = (x1.min(px as f64 + 1.0) - x.max(px as f64)).max(0.0);
                self.blend_over(px, py, color, ox * oy);
            }
        }
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, r: f64, paint: &Paint) {
        if r <= 0.0 {
            return;
        }
        for py in (cy - r - 1.0).floor() as i64..=(cy + r + 1.0).ceil() as i64 {
            for px in (cx - r - 1.0).floor() as i64..=(cx + r + 1.0).ceil() as i64 {
                let (sx, sy) = (px as f64 + 0.5, py as f64 + 0.5);
                let d = (sx - cx).hypot(sy - cy);
                let cov = (r + 0.5 - d).clamp(0.0, 1.0);
                if cov <= 0.0 {
                    continue;
                }
                let color = match paint {
                    Paint::Solid(c) => Some(*c),
                    Paint::Radial(g) => sample_radial(g, sx, sy),
                };
                if let Some(c) = color {
                    self.blend_over(px, py, c, cov);
                }
            }
        }
    }

    fn stroke_circle(
        &mut self,
        cx: f64,
        cy: f64,
        r: f64,
        width: f64,
        color: Rgba,
        dash: Option<[f64; 2]>,
    ) {
        if r <= 0.0 || width <= 0.0 {
            return;
        }
        let half = width / 2.0;
        let reach = r + half + 1.0;
        for py in (cy - reach).floor() as i64..=(cy + reach).ceil() as i64 {
            for px in (cx - reach).floor() as i64..=(cx + reach).ceil() as i64 {
                let (dx, dy) = (px as f64 + 0.5 - cx, py as f64 + 0.5 - cy);
                let d = dx.hypot(dy);
                let cov = (half + 0.5 - (d - r).abs()).clamp(0.0, 1.0);
                if cov <= 0.0 {
                    continue;
                }
                if let Some([on, off]) = dash {
                    // dash phase measured along the circumference
                    let s = dy.atan2(dx).rem_euclid(TAU) * r;
                    if on + off > 0.0 && s % (on + off) >= on {
                        continue;
                    }
                }
                self.blend_over(px, py, color, cov);
            }
        }
    }
}

impl Surface for PixelCanvas {
    fn size(&self) -> (u32, u32) {
        (self.w, self.h)
    }

    fn draw(&mut self, ops: &[DrawOp]) {
        for op in ops {
            match op {
                DrawOp::FillRect { x, y, w, h, color } => self.fill_rect(*x, *y, *w, *h, *color),
                DrawOp::FillCircle { cx, cy, r, paint } => self.fill_circle(*cx, *cy, *r, paint),
                DrawOp::StrokeCircle {
                    cx,
                    cy,
                    r,
                    width,
                    color,
                    dash,
                } => self.stroke_circle(*cx, *cy, *r, *width, *color, *dash),
            }
        }
    }
}

/* -----------------------------
   Radial gradients
------------------------------ */

/// Gradient parameter for a point: the largest t whose interpolated circle
/// passes through it with a non-negative radius. None means unpainted.
fn gradient_t(g: &RadialGradient, px: f64, py: f64) -> Option<f64> {
    let (cdx, cdy, dr) = (g.x1 - g.x0, g.y1 - g.y0, g.r1 - g.r0);
    let (pdx, pdy) = (px - g.x0, py - g.y0);
    let a = cdx * cdx + cdy * cdy - dr * dr;
    let b = pdx * cdx + pdy * cdy + g.r0 * dr;
    let c = pdx * pdx + pdy * pdy - g.r0 * g.r0;
    let radius_ok = |t: f64| g.r0 + t * dr >= 0.0;

    if a.abs() < 1e-9 {
        if b.abs() < 1e-12 {
            return None;
        }
        let t = c / (2.0 * b);
        return radius_ok(t).then_some(t);
    }

    let disc = b * b - a * c;
    if disc < 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    let (t1, t2) = ((b + sq) / a, (b - sq) / a);
    let (hi, lo) = if t1 >= t2 { (t1, t2) } else { (t2, t1) };
    if radius_ok(hi) {
        Some(hi)
    } else if radius_ok(lo) {
        Some(lo)
    } else {
        None
    }
}

fn mix(a: Rgba, b: Rgba, t: f64) -> Rgba {
    let ch = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round().clamp(0.0, 255.0) as u8;
    Rgba {
        r: ch(a.r, b.r),
        g: ch(a.g, b.g),
        b: ch(a.b, b.b),
        a: a.a + (b.a - a.a) * t,
    }
}

fn sample_stops(stops: &[ColorStop], t: f64) -> Option<Rgba> {
    let first = stops.first()?;
    let t = t.clamp(0.0, 1.0);
    if t <= first.offset {
        return Some(first.color);
    }
    for pair in stops.windows(2) {
        let (s0, s1) = (pair[0], pair[1]);
        if t <= s1.offset {
            let span = s1.offset - s0.offset;
            let f = if span <= 0.0 { 1.0 } else { (t - s0.offset) / span };
            return Some(mix(s0.color, s1.color, f));
        }
    }
    stops.last().map(|s| s.color)
}

pub(crate) fn sample_radial(g: &RadialGradient, px: f64, py: f64) -> Option<Rgba> {
    sample_stops(&g.stops, gradient_t(g, px, py)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn white(a: f64) -> Rgba {
        Rgba {
            r: 255,
            g: 255,
            b: 255,
            a,
        }
    }

    fn concentric(r0: f64, r1: f64) -> RadialGradient {
        RadialGradient {
            x0: 10.0,
            y0: 10.0,
            r0,
            x1: 10.0,
            y1: 10.0,
            r1,
            stops: vec![
                ColorStop {
                    offset: 0.0,
                    color: white(1.0),
                },
                ColorStop {
                    offset: 1.0,
                    color: white(0.0),
                },
            ],
        }
    }

    #[test]
    fn fade_blends_over_previous_contents() {
        let mut c = PixelCanvas::new(4, 4);
        c.draw(&[DrawOp::FillRect {
            x: 0.0,
            y: 0.0,
            w: 4.0,
            h: 4.0,
            color: white(0.2),
        }]);
        let p = c.get(2, 2).unwrap();
        assert_eq!(p.a, 255);
        assert!((p.r as i32 - 55).abs() <= 1, "r = {}", p.r);

        // repeated fades converge back toward the fill colour
        let dark = Rgba {
            r: 5,
            g: 8,
            b: 20,
            a: 0.2,
        };
        for _ in 0..40 {
            c.draw(&[DrawOp::FillRect {
                x: 0.0,
                y: 0.0,
                w: 4.0,
                h: 4.0,
                color: dark,
            }]);
        }
        assert!(c.get(2, 2).unwrap().r <= 10);
    }

    #[test]
    fn fractional_rect_touches_one_pixel() {
        let mut c = PixelCanvas::new(4, 4);
        c.draw(&[DrawOp::FillRect {
            x: 1.0,
            y: 1.0,
            w: 0.5,
            h: 0.5,
            color: white(1.0),
        }]);
        let changed: Vec<usize> = (0..c.px.len()).filter(|&i| c.px[i] != BACKDROP).collect();
        assert_eq!(changed, vec![c.idx(1, 1)]);
        // quarter coverage
        let p = c.get(1, 1).unwrap();
        assert!((p.r as i32 - 67).abs() <= 1, "r = {}", p.r);

        c.draw(&[DrawOp::FillRect {
            x: 2.0,
            y: 2.0,
            w: 0.0,
            h: 0.0,
            color: white(1.0),
        }]);
        assert_eq!(c.get(2, 2), Some(BACKDROP));
    }

    #[test]
    fn solid_circle_is_clipped_and_centered() {
        let mut c = PixelCanvas::new(20, 20);
        let green = Rgba {
            r: 34,
            g: 197,
            b: 94,
            a: 1.0,
        };
        c.draw(&[DrawOp::FillCircle {
            cx: 2.0,
            cy: 2.0,
            r: 4.0,
            paint: Paint::Solid(green),
        }]);
        assert_eq!(
            c.get(1, 1),
            Some(Pixel {
                r: 34,
                g: 197,
                b: 94,
                a: 255
            })
        );
        assert_eq!(c.get(10, 10), Some(BACKDROP));
    }

    #[test]
    fn concentric_gradient_parameter() {
        let g = concentric(2.0, 6.0);
        assert_abs_diff_eq!(gradient_t(&g, 14.0, 10.0).unwrap(), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(gradient_t(&g, 10.0, 16.0).unwrap(), 1.0, epsilon = 1e-12);
        // inside the inner circle pads to the first stop
        let inner = sample_radial(&g, 10.5, 10.0).unwrap();
        assert_abs_diff_eq!(inner.a, 1.0);
        let outer = sample_radial(&g, 30.0, 10.0).unwrap();
        assert_abs_diff_eq!(outer.a, 0.0);
        let mid = sample_radial(&g, 14.0, 10.0).unwrap();
        assert_abs_diff_eq!(mid.a, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn offset_focus_gradient_starts_at_highlight() {
        let g = RadialGradient {
            x0: 40.0,
            y0: 40.0,
            r0: 20.0,
            x1: 70.0,
            y1: 70.0,
            r1: 120.0,
            stops: vec![
                ColorStop {
                    offset: 0.0,
                    color: white(1.0),
                },
                ColorStop {
                    offset: 1.0,
                    color: Rgba {
                        r: 0,
                        g: 0,
                        b: 0,
                        a: 1.0,
                    },
                },
            ],
        };
        let at_highlight = sample_radial(&g, 40.0, 40.0).unwrap();
        assert_eq!(at_highlight.r, 255);
        let rim = sample_radial(&g, 190.0, 70.0).unwrap();
        assert_eq!(rim.r, 0);
        let between = sample_radial(&g, 110.0, 70.0).unwrap();
        assert!(between.r > 0 && between.r < 255);
    }

    #[test]
    fn stops_interpolate_between_neighbours() {
        let stops = [
            ColorStop {
                offset: 0.0,
                color: white(1.0),
            },
            ColorStop {
                offset: 0.5,
                color: Rgba {
                    r: 0,
                    g: 0,
                    b: 0,
                    a: 1.0,
                },
            },
            ColorStop {
                offset: 1.0,
                color: Rgba {
                    r: 0,
                    g: 0,
                    b: 200,
                    a: 1.0,
                },
            },
        ];
        assert_eq!(sample_stops(&stops, 0.25).map(|c| c.r), Some(128));
        assert_eq!(sample_stops(&stops, 0.75).map(|c| c.b), Some(100));
        assert_eq!(sample_stops(&stops, 7.0).map(|c| c.b), Some(200));
        assert!(sample_stops(&[], 0.5).is_none());
    }

    fn ring_pixels(dash: Option<[f64; 2]>) -> usize {
        let mut c = PixelCanvas::new(64, 64);
        c.draw(&[DrawOp::StrokeCircle {
            cx: 32.0,
            cy: 32.0,
            r: 20.0,
            width: 1.0,
            color: white(1.0),
            dash,
        }]);
        // centre stays untouched
        assert_eq!(c.get(32, 32), Some(BACKDROP));
        c.px.iter().filter(|p| **p != BACKDROP).count()
    }

    #[test]
    fn dashed_ring_leaves_gaps() {
        let solid = ring_pixels(None);
        let dashed = ring_pixels(Some([5.0, 5.0]));
        assert!(solid > 100);
        assert!(dashed > solid / 3 && dashed < solid * 2 / 3, "{dashed} of {solid}");
    }

    #[test]
    fn degenerate_shapes_draw_nothing() {
        let mut c = PixelCanvas::new(8, 8);
        c.draw(&[
            DrawOp::StrokeCircle {
                cx: 4.0,
                cy: 4.0,
                r: 0.0,
                width: 2.0,
                color: white(1.0),
                dash: None,
            },
            DrawOp::FillCircle {
                cx: 4.0,
                cy: 4.0,
                r: 0.0,
                paint: Paint::Solid(white(1.0)),
            },
        ]);
        assert!(c.px.iter().all(|p| *p == BACKDROP));
        assert_eq!(c.size(), (8, 8));
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Surface;
    use crate::render::DrawOp;

    /// Counts frames and keeps the last op list instead of rasterising.
    pub(crate) struct RecordingSurface {
        pub(crate) w: u32,
        pub(crate) h: u32,
        pub(crate) frames: u64,
        pub(crate) last: Vec<DrawOp>,
    }

    impl RecordingSurface {
        pub(crate) fn new(w: u32, h: u32) -> Self {
            Self {
                w,
                h,
                frames: 0,
                last: Vec::new(),
            }
        }
    }

    impl Surface for RecordingSurface {
        fn size(&self) -> (u32, u32) {
            (self.w, self.h)
        }

        fn draw(&mut self, ops: &[DrawOp]) {
            self.frames += 1;
            self.last = ops.to_vec();
        }
    }
}
