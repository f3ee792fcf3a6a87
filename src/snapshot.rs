//! Memory snapshot artifact, filters, and rendering.

use serde::{Deserialize, Serialize};

use crate::ProfgateResult;

/// Allocation totals attributed to one site label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocSite {
    pub site: String,
    pub count: u64,
    pub bytes: u64,
}

/// The artifact of one traced invocation, consumed once by the sink.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorySnapshot {
    pub sites: Vec<AllocSite>,
    pub allocation_count: u64,
    pub allocated_bytes: u64,
    pub freed_bytes: u64,
}

/// How much detail the rendered snapshot itemizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    #[default]
    Summary,
    PerSite,
}

/// Site exclusion by substring match on the site label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceFilter {
    pub exclude: Vec<String>,
}

impl TraceFilter {
    pub fn exclude(mut self, pattern: &str) -> Self {
        self.exclude.push(pattern.to_string());
        self
    }

    pub fn matches(&self, site: &str) -> bool {
        self.exclude.iter().any(|p| site.contains(p))
    }
}

impl MemorySnapshot {
    /// Copy of the snapshot with excluded sites removed. Totals are
    /// recomputed from the surviving sites so the rendered summary agrees
    /// with the itemized rows.
    pub fn filtered(&self, filter: &TraceFilter) -> Self {
        if filter.exclude.is_empty() {
            return self.clone();
        }
        let sites: Vec<AllocSite> = self
            .sites
            .iter()
            .filter(|s| !filter.matches(&s.site))
            .cloned()
            .collect();
        let allocation_count = sites.iter().map(|s| s.count).sum();
        let allocated_bytes = sites.iter().map(|s| s.bytes).sum();
        Self {
            sites,
            allocation_count,
            allocated_bytes,
            freed_bytes: self.freed_bytes,
        }
    }

    pub fn render(&self, granularity: Granularity) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "         {} allocations, {} bytes allocated, {} bytes freed\n",
            self.allocation_count, self.allocated_bytes, self.freed_bytes
        ));
        if granularity == Granularity::PerSite {
            out.push('\n');
            out.push_str("    count      bytes  site\n");
            let mut sites: Vec<&AllocSite> = self.sites.iter().collect();
            sites.sort_by(|a, b| b.bytes.cmp(&a.bytes).then_with(|| a.site.cmp(&b.site)));
            for site in sites {
                out.push_str(&format!(
                    "{:>9}  {:>9}  {}\n",
                    site.count, site.bytes, site.site
                ));
            }
        }
        out
    }

    pub fn to_json(&self) -> ProfgateResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
