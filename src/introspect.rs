//! Toggle resolution against a callable's declared signature.

use crate::{CallArgs, Signature};

/// Resolves the boolean toggle named `keyword` for one invocation.
///
/// Resolution order, first match wins: named argument, positional argument
/// at the keyword's declared slot, declared default. The resolved value
/// must be exactly `Bool(true)` to fire; any other type resolves false
/// even when truthy.
///
/// A keyword that is not a declared parameter resolves false with a
/// diagnostic and never errors; the wrapped callable still runs normally.
pub fn resolve_toggle(signature: &Signature, keyword: &str, args: &CallArgs) -> bool {
    if !signature.has_param(keyword) {
        tracing::warn!(
            keyword,
            callable = signature.qualname(),
            "toggle keyword is not a declared parameter; skipping instrumentation"
        );
        return false;
    }

    let resolved = args
        .get_named(keyword)
        .or_else(|| {
            signature
                .position_of(keyword)
                .and_then(|slot| args.get_positional(slot))
        })
        .or_else(|| signature.default_of(keyword));

    resolved.and_then(|v| v.as_bool()).unwrap_or(false)
}
