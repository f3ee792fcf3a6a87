//! Profiling engine seam and the default wall-clock engine.

use std::time::Instant;

use crate::{FrameInfo, ProfileReport, ProfileRow};

/// Runs a callable under instrumentation and produces its report.
///
/// The engine is a collaborator: the wrapper decides whether and where to
/// invoke it, not how it measures. Panics from the callable unwind through
/// `run` untouched, so a failed call never yields a partial report.
pub trait ProfileEngine {
    fn run<R>(&mut self, frame: &FrameInfo, f: impl FnOnce() -> R) -> (R, ProfileReport);
}

/// Times the single wrapped call and reports one row anchored at the
/// signature's declared frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct WallClockEngine;

impl ProfileEngine for WallClockEngine {
    fn run<R>(&mut self, frame: &FrameInfo, f: impl FnOnce() -> R) -> (R, ProfileReport) {
        let start = Instant::now();
        let ret = f();
        let elapsed = start.elapsed().as_secs_f64();
        let report = ProfileReport {
            rows: vec![ProfileRow {
                ncalls: 1,
                pcalls: 1,
                tottime: elapsed,
                cumtime: elapsed,
                frame: frame.clone(),
            }],
        };
        (ret, report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> FrameInfo {
        FrameInfo {
            function: "add".to_string(),
            file: "math.rs".to_string(),
            line: 3,
        }
    }

    #[test]
    fn wall_clock_reports_one_row() {
        let mut engine = WallClockEngine;
        let (ret, report) = engine.run(&frame(), || 1 + 2);
        assert_eq!(ret, 3);
        assert_eq!(report.rows.len(), 1);
        let row = &report.rows[0];
        assert_eq!(row.ncalls, 1);
        assert_eq!(row.frame.function, "add");
        assert!(row.cumtime >= 0.0);
        assert_eq!(row.cumtime, row.tottime);
    }

    #[test]
    fn return_value_passes_through_unchanged() {
        let mut engine = WallClockEngine;
        let (ret, _) = engine.run(&frame(), || vec![1, 2, 3]);
        assert_eq!(ret, vec![1, 2, 3]);
    }
}
