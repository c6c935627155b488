/* -----------------------------
   Cooperative timers and frame requests.
   Everything runs on the UI thread; callbacks are dispatched by the
   caller between polls, never preempted.
------------------------------ */

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct TimerToken(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct FrameToken(u64);

struct Interval {
    token: TimerToken,
    period_ms: f64,
    due_ms: f64,
}

#[derive(Default)]
pub(crate) struct Host {
    next_id: u64,
    intervals: Vec<Interval>,
    frames: Vec<FrameToken>,
}

impl Host {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn fresh_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub(crate) fn set_interval(&mut self, now_ms: f64, period_ms: f64) -> TimerToken {
        let token = TimerToken(self.fresh_id());
        self.intervals.push(Interval {
            token,
            period_ms: period_ms.max(1.0),
            due_ms: now_ms + period_ms.max(1.0),
        });
        token
    }

    pub(crate) fn clear_interval(&mut self, token: TimerToken) {
        self.intervals.retain(|iv| iv.token != token);
    }

    pub(crate) fn request_frame(&mut self) -> FrameToken {
        let token = FrameToken(self.fresh_id());
        self.frames.push(token);
        token
    }

    pub(crate) fn cancel_frame(&mut self, token: FrameToken) {
        self.frames.retain(|f| *f != token);
    }

    /// Intervals due at `now_ms`. Each fires at most once per poll and is
    /// re-armed one period from now.
    pub(crate) fn poll(&mut self, now_ms: f64) -> Vec<TimerToken> {
        let mut fired = Vec::new();
        for iv in &mut self.intervals {
            if now_ms >= iv.due_ms {
                fired.push(iv.token);
                iv.due_ms = now_ms + iv.period_ms;
            }
        }
        fired
    }

    /// Frame requests pending before this repaint. Requests made while
    /// handling them wait for the next repaint.
    pub(crate) fn take_frames(&mut self) -> Vec<FrameToken> {
        std::mem::take(&mut self.frames)
    }

    pub(crate) fn is_idle(&self) -> bool {
        self.intervals.is_empty() && self.frames.is_empty()
    }
}

/// Wall clock in milliseconds since the Unix epoch.
pub(crate) fn now_ms() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_fires_each_period() {
        let mut host = Host::new();
        let t = host.set_interval(0.0, 5_000.0);
        assert!(host.poll(4_999.0).is_empty());
        assert_eq!(host.poll(5_000.0), vec![t]);
        assert!(host.poll(9_999.0).is_empty());
        assert_eq!(host.poll(10_000.0), vec![t]);
    }

    #[test]
    fn late_poll_fires_once_and_rearms_from_now() {
        let mut host = Host::new();
        let t = host.set_interval(0.0, 1_000.0);
        assert_eq!(host.poll(3_500.0), vec![t]);
        assert!(host.poll(4_000.0).is_empty());
        assert_eq!(host.poll(4_500.0), vec![t]);
    }

    #[test]
    fn cleared_interval_never_fires() {
        let mut host = Host::new();
        let a = host.set_interval(0.0, 100.0);
        let b = host.set_interval(0.0, 100.0);
        host.clear_interval(a);
        assert_eq!(host.poll(100.0), vec![b]);
        host.clear_interval(b);
        assert!(host.poll(1_000.0).is_empty());
        assert!(host.is_idle());
    }

    #[test]
    fn frames_drain_once() {
        let mut host = Host::new();
        let f1 = host.request_frame();
        let f2 = host.request_frame();
        host.cancel_frame(f1);
        assert_eq!(host.take_frames(), vec![f2]);
        assert!(host.take_frames().is_empty());
        let f3 = host.request_frame();
        assert_ne!(f3, f2);
        assert!(!host.is_idle());
    }
}
