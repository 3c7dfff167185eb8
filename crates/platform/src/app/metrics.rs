use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoopMetricsSnapshot {
    pub iterations_per_second: f32,
    pub work_time_ms: f32,
    pub overruns: u32,
}

#[derive(Debug)]
pub(crate) struct MetricsAccumulator {
    interval_start: Instant,
    interval: Duration,
    iterations: u32,
    overruns: u32,
    work_time_sum: Duration,
}

impl MetricsAccumulator {
    pub(crate) fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval_start: now,
            interval,
            iterations: 0,
            overruns: 0,
            work_time_sum: Duration::ZERO,
        }
    }

    pub(crate) fn record_iteration(&mut self, work: Duration) {
        self.iterations = self.iterations.saturating_add(1);
        self.work_time_sum = self.work_time_sum.saturating_add(work);
    }

    pub(crate) fn record_overrun(&mut self) {
        self.overruns = self.overruns.saturating_add(1);
    }

    pub(crate) fn maybe_snapshot(&mut self, now: Instant) -> Option<LoopMetricsSnapshot> {
        let elapsed = now.saturating_duration_since(self.interval_start);
        if elapsed < self.interval {
            return None;
        }

        let elapsed_seconds = elapsed.as_secs_f32().max(f32::EPSILON);
        let work_time_ms = if self.iterations == 0 {
            0.0
        } else {
            (self.work_time_sum.as_secs_f32() / self.iterations as f32) * 1000.0
        };

        let snapshot = LoopMetricsSnapshot {
            iterations_per_second: self.iterations as f32 / elapsed_seconds,
            work_time_ms,
            overruns: self.overruns,
        };

        self.interval_start = now;
        self.iterations = 0;
        self.overruns = 0;
        self.work_time_sum = Duration::ZERO;

        Some(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_computes_expected_values() {
        let base = Instant::now();
        let mut accumulator = MetricsAccumulator::new(Duration::from_secs(1), base);

        for _ in 0..30 {
            accumulator.record_iteration(Duration::from_millis(10));
        }
        accumulator.record_overrun();
        accumulator.record_overrun();

        let snapshot = accumulator
            .maybe_snapshot(base + Duration::from_secs(1))
            .expect("snapshot should be emitted");

        assert!((snapshot.iterations_per_second - 30.0).abs() < 0.05);
        assert!((snapshot.work_time_ms - 10.0).abs() < 0.001);
        assert_eq!(snapshot.overruns, 2);
    }

    #[test]
    fn snapshot_not_emitted_before_interval() {
        let base = Instant::now();
        let mut accumulator = MetricsAccumulator::new(Duration::from_secs(1), base);
        accumulator.record_iteration(Duration::from_millis(16));

        assert!(accumulator
            .maybe_snapshot(base + Duration::from_millis(500))
            .is_none());
    }

    #[test]
    fn snapshot_resets_interval_counters() {
        let base = Instant::now();
        let mut accumulator = MetricsAccumulator::new(Duration::from_secs(1), base);
        accumulator.record_iteration(Duration::from_millis(5));
        accumulator.record_overrun();
        accumulator
            .maybe_snapshot(base + Duration::from_secs(1))
            .expect("first snapshot");

        let second = accumulator
            .maybe_snapshot(base + Duration::from_secs(2))
            .expect("second snapshot");

        assert_eq!(second.overruns, 0);
        assert_eq!(second.work_time_ms, 0.0);
        assert_eq!(second.iterations_per_second, 0.0);
    }
}
