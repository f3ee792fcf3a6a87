//! Eager validation of sink write modes and report sort keys.

use serde::{Deserialize, Serialize};

use crate::{ProfgateError, ProfgateResult};

/// How a path destination is opened for one emit.
///
/// The binary/text variants are accepted for parity with the source
/// ecosystem's mode strings and write identically; append vs truncate is
/// what matters for path destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    Append,
    AppendBinary,
    AppendText,
    Truncate,
    TruncateBinary,
    TruncateText,
}

impl WriteMode {
    pub fn parse(token: &str) -> ProfgateResult<Self> {
        match token {
            "a" => Ok(Self::Append),
            "ab" => Ok(Self::AppendBinary),
            "at" => Ok(Self::AppendText),
            "w" => Ok(Self::Truncate),
            "wb" => Ok(Self::TruncateBinary),
            "wt" => Ok(Self::TruncateText),
            other => Err(ProfgateError::InvalidMode(other.to_string())),
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            Self::Append => "a",
            Self::AppendBinary => "ab",
            Self::AppendText => "at",
            Self::Truncate => "w",
            Self::TruncateBinary => "wb",
            Self::TruncateText => "wt",
        }
    }

    pub fn truncates(&self) -> bool {
        matches!(
            self,
            Self::Truncate | Self::TruncateBinary | Self::TruncateText
        )
    }
}

pub fn is_valid_mode(token: &str) -> bool {
    WriteMode::parse(token).is_ok()
}

/// Report row ordering criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Calls,
    PrimitiveCalls,
    Cumulative,
    Nfl,
    Name,
    StdName,
    Filename,
    Line,
    Time,
}

impl SortKey {
    pub fn parse(token: &str) -> ProfgateResult<Self> {
        match token {
            "calls" | "ncalls" => Ok(Self::Calls),
            "pcalls" => Ok(Self::PrimitiveCalls),
            "cumulative" | "cumtime" => Ok(Self::Cumulative),
            "nfl" => Ok(Self::Nfl),
            "name" => Ok(Self::Name),
            "stdname" => Ok(Self::StdName),
            "filename" | "file" | "module" => Ok(Self::Filename),
            "line" => Ok(Self::Line),
            "time" | "tottime" => Ok(Self::Time),
            other => Err(ProfgateError::InvalidSortKey(other.to_string())),
        }
    }

    /// Human form used in the report's `Ordered by:` header.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Calls => "call count",
            Self::PrimitiveCalls => "primitive call count",
            Self::Cumulative => "cumulative time",
            Self::Nfl => "name/file/line",
            Self::Name => "function name",
            Self::StdName => "standard name",
            Self::Filename => "file name",
            Self::Line => "line number",
            Self::Time => "internal time",
        }
    }
}

pub fn is_valid_sort_key(token: &str) -> bool {
    SortKey::parse(token).is_ok()
}

/// A write mode as supplied to a builder: either the canonical enum or a
/// raw token, resolved once at construction time.
#[derive(Debug, Clone)]
pub enum ModeSpec {
    Canonical(WriteMode),
    Token(String),
}

impl ModeSpec {
    pub fn resolve(self) -> ProfgateResult<WriteMode> {
        match self {
            Self::Canonical(mode) => Ok(mode),
            Self::Token(token) => WriteMode::parse(&token),
        }
    }
}

impl From<WriteMode> for ModeSpec {
    fn from(value: WriteMode) -> Self {
        Self::Canonical(value)
    }
}

impl From<&str> for ModeSpec {
    fn from(value: &str) -> Self {
        Self::Token(value.to_string())
    }
}

/// A sort key as supplied to a builder, in either form.
#[derive(Debug, Clone)]
pub enum SortSpec {
    Canonical(SortKey),
    Token(String),
}

impl SortSpec {
    pub fn resolve(self) -> ProfgateResult<SortKey> {
        match self {
            Self::Canonical(key) => Ok(key),
            Self::Token(token) => SortKey::parse(&token),
        }
    }
}

impl From<SortKey> for SortSpec {
    fn from(value: SortKey) -> Self {
        Self::Canonical(value)
    }
}

impl From<&str> for SortSpec {
    fn from(value: &str) -> Self {
        Self::Token(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepted_modes() {
        for token in ["a", "ab", "at", "w", "wb", "wt"] {
            assert!(is_valid_mode(token), "{token}");
            let mode = WriteMode::parse(token).expect("mode");
            assert_eq!(mode.token(), token);
        }
        assert!(WriteMode::parse("w").expect("mode").truncates());
        assert!(!WriteMode::parse("at").expect("mode").truncates());
    }

    #[test]
    fn rejected_modes() {
        for token in ["r", "rb", "x", "", "append"] {
            assert!(!is_valid_mode(token), "{token}");
            assert!(matches!(
                WriteMode::parse(token),
                Err(ProfgateError::InvalidMode(t)) if t == token
            ));
        }
    }

    #[test]
    fn accepted_sort_keys() {
        let cases = [
            ("calls", SortKey::Calls),
            ("ncalls", SortKey::Calls),
            ("pcalls", SortKey::PrimitiveCalls),
            ("cumulative", SortKey::Cumulative),
            ("cumtime", SortKey::Cumulative),
            ("nfl", SortKey::Nfl),
            ("name", SortKey::Name),
            ("stdname", SortKey::StdName),
            ("filename", SortKey::Filename),
            ("file", SortKey::Filename),
            ("module", SortKey::Filename),
            ("line", SortKey::Line),
            ("time", SortKey::Time),
            ("tottime", SortKey::Time),
        ];
        for (token, expected) in cases {
            assert!(is_valid_sort_key(token), "{token}");
            assert_eq!(SortKey::parse(token).expect("sort key"), expected);
        }
    }

    #[test]
    fn rejected_sort_keys() {
        for token in ["INVALID", "cum", "", "Calls"] {
            assert!(!is_valid_sort_key(token), "{token}");
            assert!(matches!(
                SortKey::parse(token),
                Err(ProfgateError::InvalidSortKey(t)) if t == token
            ));
        }
    }

    #[test]
    fn specs_resolve_both_forms() {
        let from_enum: ModeSpec = WriteMode::Append.into();
        assert_eq!(from_enum.resolve().expect("mode"), WriteMode::Append);
        let from_token: ModeSpec = "wb".into();
        assert_eq!(from_token.resolve().expect("mode"), WriteMode::TruncateBinary);
        let bad: ModeSpec = "r".into();
        assert!(bad.resolve().is_err());

        let key: SortSpec = "cumtime".into();
        assert_eq!(key.resolve().expect("key"), SortKey::Cumulative);
        let key: SortSpec = SortKey::Time.into();
        assert_eq!(key.resolve().expect("key"), SortKey::Time);
    }

    #[test]
    fn descriptions_match_report_headers() {
        assert_eq!(SortKey::Cumulative.description(), "cumulative time");
        assert_eq!(SortKey::Time.description(), "internal time");
        assert_eq!(SortKey::Calls.description(), "call count");
    }
}
