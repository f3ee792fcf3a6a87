//! Explicit callable signature descriptions.
//!
//! There is no runtime reflection over function parameters, so the caller
//! registers parameter metadata alongside the callable at wrap time. A
//! `Signature` is immutable once built.

use serde::{Deserialize, Serialize};

use std::collections::BTreeMap;

use crate::{ArgValue, FrameInfo};

/// The implicit receiver of the source callable, if any.
///
/// Declared parameters never include the receiver, and caller-supplied
/// positional arguments never include it either; declaring a receiver
/// records the source shape without shifting positional alignment. A
/// wrapper that changes the visible parameter list must register the
/// signature it actually exposes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Receiver {
    #[default]
    None,
    Instance,
    Class,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    /// `None` means the parameter has no declared default, which is
    /// distinct from an explicit `ArgValue::Null` default.
    pub default: Option<ArgValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    qualname: String,
    file: String,
    line: u32,
    receiver: Receiver,
    params: Vec<Param>,
}

impl Signature {
    /// Starts a signature for the callable named `qualname`. The call site
    /// of the builder is recorded as the callable's source location.
    #[track_caller]
    pub fn builder(qualname: &str) -> SignatureBuilder {
        let location = std::panic::Location::caller();
        SignatureBuilder {
            qualname: qualname.to_string(),
            file: location.file().to_string(),
            line: location.line(),
            receiver: Receiver::None,
            params: Vec::new(),
        }
    }

    pub fn qualname(&self) -> &str {
        &self.qualname
    }

    pub fn receiver(&self) -> Receiver {
        self.receiver
    }

    pub fn has_param(&self, name: &str) -> bool {
        self.params.iter().any(|p| p.name == name)
    }

    /// Positional slot of `name` in declaration order. Receivers are not
    /// declared parameters, so slot 0 is the first real parameter.
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|p| p.name == name)
    }

    /// Declared default of `name`, if the parameter exists and has one.
    pub fn default_of(&self, name: &str) -> Option<&ArgValue> {
        self.params
            .iter()
            .find(|p| p.name == name)
            .and_then(|p| p.default.as_ref())
    }

    /// Map of every parameter name to its default, substituting `fallback`
    /// where no default is declared.
    pub fn defaults(&self, fallback: &ArgValue) -> BTreeMap<String, ArgValue> {
        self.params
            .iter()
            .map(|p| {
                let value = p.default.clone().unwrap_or_else(|| fallback.clone());
                (p.name.clone(), value)
            })
            .collect()
    }

    pub fn frame(&self) -> FrameInfo {
        FrameInfo {
            function: self.qualname.clone(),
            file: self.file.clone(),
            line: self.line,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SignatureBuilder {
    qualname: String,
    file: String,
    line: u32,
    receiver: Receiver,
    params: Vec<Param>,
}

impl SignatureBuilder {
    pub fn instance_method(mut self) -> Self {
        self.receiver = Receiver::Instance;
        self
    }

    pub fn class_method(mut self) -> Self {
        self.receiver = Receiver::Class;
        self
    }

    /// Declares a parameter without a default value.
    pub fn param(mut self, name: &str) -> Self {
        self.params.push(Param {
            name: name.to_string(),
            default: None,
        });
        self
    }

    /// Declares a parameter with a default value.
    pub fn param_with_default(mut self, name: &str, default: impl Into<ArgValue>) -> Self {
        self.params.push(Param {
            name: name.to_string(),
            default: Some(default.into()),
        });
        self
    }

    pub fn build(self) -> Signature {
        Signature {
            qualname: self.qualname,
            file: self.file,
            line: self.line,
            receiver: self.receiver,
            params: self.params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example() -> Signature {
        Signature::builder("example")
            .param("a")
            .param("b")
            .param("debug")
            .build()
    }

    fn magic() -> Signature {
        Signature::builder("Example.magic")
            .instance_method()
            .param("a")
            .param_with_default("profile", true)
            .build()
    }

    #[test]
    fn position_follows_declaration_order() {
        let sig = example();
        assert_eq!(sig.position_of("a"), Some(0));
        assert_eq!(sig.position_of("debug"), Some(2));
        assert_eq!(sig.position_of("verbose"), None);
    }

    #[test]
    fn receiver_never_shifts_alignment() {
        // Declaring a receiver records the source shape only; the first
        // declared parameter still sits at positional slot 0.
        let sig = magic();
        assert_eq!(sig.receiver(), Receiver::Instance);
        assert_eq!(sig.position_of("a"), Some(0));
        assert_eq!(sig.position_of("profile"), Some(1));
    }

    #[test]
    fn default_lookup_distinguishes_missing_from_null() {
        let sig = Signature::builder("f")
            .param("a")
            .param_with_default("b", ArgValue::Null)
            .build();
        assert_eq!(sig.default_of("a"), None);
        assert_eq!(sig.default_of("b"), Some(&ArgValue::Null));
        assert_eq!(sig.default_of("c"), None);
    }

    #[test]
    fn defaults_map_substitutes_fallback() {
        let sig = Signature::builder("example_2")
            .param_with_default("a", 1i64)
            .param_with_default("b", 2i64)
            .param_with_default("verbose", true)
            .build();
        let map = sig.defaults(&ArgValue::Null);
        assert_eq!(map.get("a"), Some(&ArgValue::Int(1)));
        assert_eq!(map.get("verbose"), Some(&ArgValue::Bool(true)));

        let bare = example().defaults(&ArgValue::Null);
        assert_eq!(bare.get("debug"), Some(&ArgValue::Null));
        assert_eq!(bare.len(), 3);
    }

    #[test]
    fn frame_carries_builder_location() {
        let sig = example();
        let frame = sig.frame();
        assert_eq!(frame.function, "example");
        assert!(frame.file.ends_with("signature.rs"));
        assert!(frame.line > 0);
    }
}
