//! The call-toggled memory tracing wrapper.

use crate::{
    CallArgs, Destination, FrameInfo, Granularity, MemorySnapshot, ModeSpec, ProfgateResult,
    ReportSink, Signature, TraceFilter, resolve_toggle, tally_reading,
};

/// Produces a memory snapshot for one instrumented invocation.
pub trait MemoryEngine {
    fn run<R>(&mut self, frame: &FrameInfo, f: impl FnOnce() -> R) -> (R, MemorySnapshot);
}

/// Default engine: diffs the global allocation tally around the call and
/// attributes the movement to the callable's frame. Empty when the tally
/// allocator is not installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct TallyEngine;

impl MemoryEngine for TallyEngine {
    fn run<R>(&mut self, frame: &FrameInfo, f: impl FnOnce() -> R) -> (R, MemorySnapshot) {
        let before = tally_reading();
        let ret = f();
        let delta = tally_reading().since(&before);
        let sites = if delta.allocation_count == 0 {
            Vec::new()
        } else {
            vec![crate::AllocSite {
                site: frame.location(),
                count: delta.allocation_count,
                bytes: delta.allocated_bytes,
            }]
        };
        let snapshot = MemorySnapshot {
            sites,
            allocation_count: delta.allocation_count,
            allocated_bytes: delta.allocated_bytes,
            freed_bytes: delta.freed_bytes,
        };
        (ret, snapshot)
    }
}

/// Builds a [`MemoryTraced`] wrapper. The write mode is validated at
/// construction, like the profiling variant.
#[derive(Debug)]
pub struct MemoryTracerBuilder {
    keyword: String,
    destination: Destination,
    mode: ModeSpec,
    granularity: Granularity,
    filter: TraceFilter,
}

impl Default for MemoryTracerBuilder {
    fn default() -> Self {
        Self {
            keyword: "debug".to_string(),
            destination: Destination::Stdout,
            mode: ModeSpec::Canonical(crate::WriteMode::Append),
            granularity: Granularity::Summary,
            filter: TraceFilter::default(),
        }
    }
}

impl MemoryTracerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keyword(mut self, keyword: &str) -> Self {
        self.keyword = keyword.to_string();
        self
    }

    pub fn destination(mut self, destination: Destination) -> Self {
        self.destination = destination;
        self
    }

    pub fn mode(mut self, mode: impl Into<ModeSpec>) -> Self {
        self.mode = mode.into();
        self
    }

    pub fn granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    /// Excludes sites whose label contains `pattern` from emitted
    /// snapshots.
    pub fn exclude(mut self, pattern: &str) -> Self {
        self.filter = self.filter.exclude(pattern);
        self
    }

    pub fn wrap<F, R>(self, signature: Signature, func: F) -> ProfgateResult<MemoryTraced<F>>
    where
        F: FnMut(&CallArgs) -> R,
    {
        self.wrap_with_engine(signature, TallyEngine, func)
    }

    pub fn wrap_with_engine<F, R, E>(
        self,
        signature: Signature,
        engine: E,
        func: F,
    ) -> ProfgateResult<MemoryTraced<F, E>>
    where
        F: FnMut(&CallArgs) -> R,
        E: MemoryEngine,
    {
        let mode = self.mode.resolve()?;
        Ok(MemoryTraced {
            func,
            engine,
            signature,
            keyword: self.keyword,
            sink: ReportSink::new(self.destination, mode),
            granularity: self.granularity,
            filter: self.filter,
        })
    }
}

/// A wrapped callable whose toggled path snapshots allocation activity
/// instead of timing.
pub struct MemoryTraced<F, E = TallyEngine> {
    func: F,
    engine: E,
    signature: Signature,
    keyword: String,
    sink: ReportSink,
    granularity: Granularity,
    filter: TraceFilter,
}

impl<F, E> MemoryTraced<F, E> {
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }
}

impl<F, R, E> MemoryTraced<F, E>
where
    F: FnMut(&CallArgs) -> R,
    E: MemoryEngine,
{
    /// Same contract as [`crate::Profiled::call`]: the callable's value
    /// passes through unchanged, the sink is only touched when the toggle
    /// fires, and sink I/O failures surface as `Err`.
    pub fn call(&mut self, args: &CallArgs) -> ProfgateResult<R> {
        if !resolve_toggle(&self.signature, &self.keyword, args) {
            return Ok((self.func)(args));
        }

        let frame = self.signature.frame();
        let func = &mut self.func;
        let (ret, snapshot) = self.engine.run(&frame, || func(args));
        let body = snapshot.filtered(&self.filter).render(self.granularity);
        self.sink.emit(self.signature.qualname(), &body)?;
        Ok(ret)
    }
}
