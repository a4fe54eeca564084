//! Time-based stop planning along a route's cumulative-seconds profile.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const SECONDS_PER_HOUR: f64 = 3600.0;
const SECONDS_PER_MINUTE: f64 = 60.0;

/// Pick route indices near every `every_hours` mark, accepting a pick only
/// if it lies within `window_minutes` of the mark.
///
/// The first and last index are never candidates. Ties go to the lowest
/// index. Targets stop once they reach `total - window`, so a trip that is
/// only about one interval long gets no stop. The same index may be returned
/// for consecutive targets when the window is wide relative to the interval;
/// see [`StopPolicy::dedupe`].
///
/// An interval asking for more targets than the profile has points is
/// rejected with an empty plan.
pub fn plan_stops(cumulative_seconds: &[f64], every_hours: f64, window_minutes: f64) -> Vec<usize> {
    let mut out = Vec::new();
    let Some(&total) = cumulative_seconds.last() else {
        return out;
    };
    if !(every_hours.is_finite() && every_hours > 0.0) {
        warn!(every_hours, "stop interval must be positive, planning no stops");
        return out;
    }

    let step = every_hours * SECONDS_PER_HOUR;
    let window = window_minutes.max(0.0) * SECONDS_PER_MINUTE;
    let limit = total - window;
    // Targets are k * step for k >= 1 while strictly below `limit`.
    let targets = if limit > 0.0 { (limit / step).ceil() - 1.0 } else { 0.0 };
    if targets > cumulative_seconds.len() as f64 {
        warn!(
            every_hours,
            targets,
            points = cumulative_seconds.len(),
            "stop interval is shorter than the route resolution, planning no stops"
        );
        return out;
    }
    let interior = 1..cumulative_seconds.len().saturating_sub(1);

    for k in 1..=targets as usize {
        let target = k as f64 * step;
        let mut best: Option<(usize, f64)> = None;
        for i in interior.clone() {
            let err = (cumulative_seconds[i] - target).abs();
            if best.is_none_or(|(_, best_err)| err < best_err) {
                best = Some((i, err));
            }
        }
        if let Some((idx, err)) = best {
            if err <= window {
                out.push(idx);
            }
        }
    }

    out
}

/// Stop cadence used by the trip planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopPolicy {
    pub every_hours: f64,
    pub window_minutes: f64,
    /// Drop indices already picked for an earlier target.
    pub dedupe: bool,
}

impl Default for StopPolicy {
    fn default() -> Self {
        Self {
            every_hours: 3.0,
            window_minutes: 15.0,
            dedupe: false,
        }
    }
}

impl StopPolicy {
    pub fn new(every_hours: f64, window_minutes: f64) -> Self {
        Self {
            every_hours,
            window_minutes,
            ..Default::default()
        }
    }

    pub fn with_dedupe(mut self, dedupe: bool) -> Self {
        self.dedupe = dedupe;
        self
    }

    pub fn plan(&self, cumulative_seconds: &[f64]) -> Vec<usize> {
        let mut indices = plan_stops(cumulative_seconds, self.every_hours, self.window_minutes);
        if self.dedupe {
            let mut seen = std::collections::HashSet::new();
            indices.retain(|idx| seen.insert(*idx));
        }
        debug!(
            stops = indices.len(),
            every_hours = self.every_hours,
            window_minutes = self.window_minutes,
            "planned stop indices"
        );
        indices
    }
}
