//! The call-toggled CPU profiling wrapper.

use crate::{
    CallArgs, Destination, ModeSpec, ProfgateResult, ProfileEngine, ProfileOptions, ReportSink,
    Signature, SortKey, SortSpec, WallClockEngine, resolve_toggle,
};

/// Builds a [`Profiled`] wrapper. Mode and sort key are validated when the
/// wrapper is constructed, never after profiling work has started.
#[derive(Debug)]
pub struct ProfilerBuilder {
    keyword: String,
    destination: Destination,
    mode: ModeSpec,
    sort_key: SortSpec,
    options: ProfileOptions,
}

impl Default for ProfilerBuilder {
    fn default() -> Self {
        Self {
            keyword: "debug".to_string(),
            destination: Destination::Stdout,
            mode: ModeSpec::Canonical(crate::WriteMode::Append),
            sort_key: SortSpec::Canonical(SortKey::Cumulative),
            options: ProfileOptions::default(),
        }
    }
}

impl ProfilerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The argument name inspected at each call to decide whether this
    /// invocation is profiled.
    pub fn keyword(mut self, keyword: &str) -> Self {
        self.keyword = keyword.to_string();
        self
    }

    pub fn destination(mut self, destination: Destination) -> Self {
        self.destination = destination;
        self
    }

    /// Accepts the canonical [`crate::WriteMode`] or its token form
    /// (`"a"`, `"ab"`, `"at"`, `"w"`, `"wb"`, `"wt"`).
    pub fn mode(mut self, mode: impl Into<ModeSpec>) -> Self {
        self.mode = mode.into();
        self
    }

    /// Accepts the canonical [`SortKey`] or any of its token aliases.
    pub fn sort_key(mut self, key: impl Into<SortSpec>) -> Self {
        self.sort_key = key.into();
        self
    }

    pub fn options(mut self, options: ProfileOptions) -> Self {
        self.options = options;
        self
    }

    /// Validates the configuration and wraps `func` under the default
    /// wall-clock engine.
    pub fn wrap<F, R>(self, signature: Signature, func: F) -> ProfgateResult<Profiled<F>>
    where
        F: FnMut(&CallArgs) -> R,
    {
        self.wrap_with_engine(signature, WallClockEngine, func)
    }

    /// Validates the configuration and wraps `func` under `engine`.
    pub fn wrap_with_engine<F, R, E>(
        self,
        signature: Signature,
        engine: E,
        func: F,
    ) -> ProfgateResult<Profiled<F, E>>
    where
        F: FnMut(&CallArgs) -> R,
        E: ProfileEngine,
    {
        let mode = self.mode.resolve()?;
        let sort_key = self.sort_key.resolve()?;
        Ok(Profiled {
            func,
            engine,
            signature,
            keyword: self.keyword,
            sink: ReportSink::new(self.destination, mode),
            sort_key,
            options: self.options,
        })
    }
}

/// A wrapped callable. Configuration is fixed at construction; nothing is
/// retained across calls beyond it.
#[derive(Debug)]
pub struct Profiled<F, E = WallClockEngine> {
    func: F,
    engine: E,
    signature: Signature,
    keyword: String,
    sink: ReportSink,
    sort_key: SortKey,
    options: ProfileOptions,
}

impl<F, E> Profiled<F, E> {
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }
}

impl<F, R, E> Profiled<F, E>
where
    F: FnMut(&CallArgs) -> R,
    E: ProfileEngine,
{
    /// Invokes the wrapped callable with `args`.
    ///
    /// When the toggle resolves false the callable runs directly and the
    /// sink is untouched. When it resolves true the callable runs under
    /// the engine and the rendered report is emitted. Either way the
    /// callable's value is returned unchanged inside `Ok`; panics unwind
    /// untouched and their reports are discarded. Sink I/O failures
    /// surface as `Err` after the callable has completed.
    pub fn call(&mut self, args: &CallArgs) -> ProfgateResult<R> {
        if !resolve_toggle(&self.signature, &self.keyword, args) {
            return Ok((self.func)(args));
        }

        let frame = self.signature.frame();
        let func = &mut self.func;
        let (ret, report) = self.engine.run(&frame, || func(args));
        let body = report.render(self.sort_key, &self.options);
        self.sink.emit(self.signature.qualname(), &body)?;
        Ok(ret)
    }
}
