//! CPU profile report artifact and its tabular rendering.

use serde::{Deserialize, Serialize};

use std::cmp::Ordering;

use crate::{ProfgateResult, SortKey};

/// Source location of a profiled frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameInfo {
    pub function: String,
    pub file: String,
    pub line: u32,
}

impl FrameInfo {
    /// `filename:lineno(function)` form used in the report table.
    pub fn location(&self) -> String {
        format!("{}:{}({})", self.file, self.line, self.function)
    }
}

/// One aggregated frame of a profile. Times are in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRow {
    pub ncalls: u64,
    /// Primitive (non-recursive) call count; equals `ncalls` for frames
    /// that never recurse.
    pub pcalls: u64,
    pub tottime: f64,
    pub cumtime: f64,
    pub frame: FrameInfo,
}

impl ProfileRow {
    fn percall_tot(&self) -> f64 {
        if self.ncalls == 0 {
            0.0
        } else {
            self.tottime / self.ncalls as f64
        }
    }

    fn percall_cum(&self) -> f64 {
        if self.pcalls == 0 {
            0.0
        } else {
            self.cumtime / self.pcalls as f64
        }
    }

    fn calls_column(&self) -> String {
        if self.ncalls == self.pcalls {
            self.ncalls.to_string()
        } else {
            format!("{}/{}", self.ncalls, self.pcalls)
        }
    }
}

/// Rendering controls, the typed replacement for an opaque pass-through
/// option mapping: unknown options are unrepresentable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileOptions {
    /// Rows with `cumtime` strictly below this threshold (seconds) are
    /// dropped from the rendered table.
    pub min_time: f64,
    /// Cap on rendered rows, applied after sorting. `None` keeps all.
    pub max_rows: Option<usize>,
}

impl Default for ProfileOptions {
    fn default() -> Self {
        Self {
            min_time: 0.0,
            max_rows: None,
        }
    }
}

/// The artifact of one instrumented invocation. Consumed exactly once by
/// the sink and then discarded; nothing is retained across calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileReport {
    pub rows: Vec<ProfileRow>,
}

impl ProfileReport {
    pub fn total_calls(&self) -> u64 {
        self.rows.iter().map(|r| r.ncalls).sum()
    }

    pub fn primitive_calls(&self) -> u64 {
        self.rows.iter().map(|r| r.pcalls).sum()
    }

    pub fn total_time(&self) -> f64 {
        self.rows.iter().map(|r| r.tottime).sum()
    }

    /// Renders the table sorted by `key`.
    pub fn render(&self, key: SortKey, options: &ProfileOptions) -> String {
        let mut rows: Vec<&ProfileRow> = self
            .rows
            .iter()
            .filter(|r| r.cumtime >= options.min_time)
            .collect();
        rows.sort_by(|a, b| compare_rows(a, b, key));
        if let Some(cap) = options.max_rows {
            rows.truncate(cap);
        }

        let total_calls = self.total_calls();
        let primitive = self.primitive_calls();
        let mut out = String::new();
        if total_calls == primitive {
            out.push_str(&format!(
                "         {} function calls in {:.3} seconds\n\n",
                total_calls,
                self.total_time()
            ));
        } else {
            out.push_str(&format!(
                "         {} function calls ({} primitive calls) in {:.3} seconds\n\n",
                total_calls,
                primitive,
                self.total_time()
            ));
        }
        out.push_str(&format!("   Ordered by: {}\n\n", key.description()));
        out.push_str("   ncalls  tottime  percall  cumtime  percall filename:lineno(function)\n");
        for row in rows {
            out.push_str(&format!(
                "{:>9}  {:>7.3}  {:>7.3}  {:>7.3}  {:>7.3} {}\n",
                row.calls_column(),
                row.tottime,
                row.percall_tot(),
                row.cumtime,
                row.percall_cum(),
                row.frame.location()
            ));
        }
        out
    }

    pub fn to_json(&self) -> ProfgateResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// Numeric keys sort descending, name/file/line composites ascending; the
// standard-name string breaks all ties so rendering is deterministic.
fn compare_rows(a: &ProfileRow, b: &ProfileRow, key: SortKey) -> Ordering {
    let primary = match key {
        SortKey::Calls => b.ncalls.cmp(&a.ncalls),
        SortKey::PrimitiveCalls => b.pcalls.cmp(&a.pcalls),
        SortKey::Time => b.tottime.total_cmp(&a.tottime),
        SortKey::Cumulative => b.cumtime.total_cmp(&a.cumtime),
        SortKey::Name => a.frame.function.cmp(&b.frame.function),
        SortKey::Filename => a.frame.file.cmp(&b.frame.file),
        SortKey::Line => a.frame.line.cmp(&b.frame.line),
        SortKey::StdName => a.frame.location().cmp(&b.frame.location()),
        SortKey::Nfl => a
            .frame
            .function
            .cmp(&b.frame.function)
            .then_with(|| a.frame.file.cmp(&b.frame.file))
            .then_with(|| a.frame.line.cmp(&b.frame.line)),
    };
    primary.then_with(|| a.frame.location().cmp(&b.frame.location()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(function: &str, file: &str, line: u32, ncalls: u64, tottime: f64, cumtime: f64) -> ProfileRow {
        ProfileRow {
            ncalls,
            pcalls: ncalls,
            tottime,
            cumtime,
            frame: FrameInfo {
                function: function.to_string(),
                file: file.to_string(),
                line,
            },
        }
    }

    fn sample() -> ProfileReport {
        ProfileReport {
            rows: vec![
                row("alpha", "a.rs", 10, 3, 0.030, 0.090),
                row("beta", "b.rs", 20, 1, 0.200, 0.200),
                row("gamma", "c.rs", 5, 7, 0.010, 0.050),
            ],
        }
    }

    #[test]
    fn render_contains_pstats_headers() {
        let text = sample().render(SortKey::Cumulative, &ProfileOptions::default());
        assert!(text.contains("Ordered by: cumulative time"));
        assert!(text.contains(
            "ncalls  tottime  percall  cumtime  percall filename:lineno(function)"
        ));
        assert!(text.contains("11 function calls in 0.240 seconds"));
    }

    #[test]
    fn cumulative_sorts_descending() {
        let text = sample().render(SortKey::Cumulative, &ProfileOptions::default());
        let beta = text.find("beta").expect("beta row");
        let alpha = text.find("alpha").expect("alpha row");
        let gamma = text.find("gamma").expect("gamma row");
        assert!(beta < alpha && alpha < gamma);
    }

    #[test]
    fn name_sorts_ascending() {
        let text = sample().render(SortKey::Name, &ProfileOptions::default());
        let alpha = text.find("alpha").expect("alpha row");
        let beta = text.find("beta").expect("beta row");
        assert!(alpha < beta);
    }

    #[test]
    fn calls_sorts_descending() {
        let text = sample().render(SortKey::Calls, &ProfileOptions::default());
        let gamma = text.find("gamma").expect("gamma row");
        let alpha = text.find("alpha").expect("alpha row");
        assert!(gamma < alpha);
    }

    #[test]
    fn options_filter_and_cap_rows() {
        let report = sample();
        let filtered = report.render(
            SortKey::Cumulative,
            &ProfileOptions {
                min_time: 0.060,
                max_rows: None,
            },
        );
        assert!(filtered.contains("beta"));
        assert!(filtered.contains("alpha"));
        assert!(!filtered.contains("gamma"));

        let capped = report.render(
            SortKey::Cumulative,
            &ProfileOptions {
                min_time: 0.0,
                max_rows: Some(1),
            },
        );
        assert!(capped.contains("beta"));
        assert!(!capped.contains("alpha"));
    }

    #[test]
    fn recursive_frames_show_both_counts() {
        let mut recursive = row("rec", "r.rs", 1, 5, 0.010, 0.050);
        recursive.pcalls = 2;
        let report = ProfileReport { rows: vec![recursive] };
        let text = report.render(SortKey::Time, &ProfileOptions::default());
        assert!(text.contains("5/2"));
        assert!(text.contains("5 function calls (2 primitive calls)"));
    }

    #[test]
    fn json_export_is_deterministic() {
        let a = sample().to_json().expect("json");
        let b = sample().to_json().expect("json");
        assert_eq!(a, b);
        assert!(a.contains("\"function\": \"alpha\""));
    }
}
