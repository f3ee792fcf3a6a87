//! Profgate core library: call-toggled profiling and allocation tracing
//! wrappers for dynamically-shaped callables.

mod args;
mod engine;
mod error;
mod introspect;
mod memtrace;
mod profiler;
mod report;
mod signature;
mod sink;
mod snapshot;
mod tally;
mod validate;

pub use args::*;
pub use engine::*;
pub use error::*;
pub use introspect::*;
pub use memtrace::*;
pub use profiler::*;
pub use report::*;
pub use signature::*;
pub use sink::*;
pub use snapshot::*;
pub use tally::*;
pub use validate::*;
