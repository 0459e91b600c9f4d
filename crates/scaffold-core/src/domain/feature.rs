//! Feature value object.
//!
//! A [`Feature`] is a capability that gates schema nodes (TypeScript support,
//! a test runner, a bundler, ...). Feature *names* live in the feature
//! configuration and are many-to-one with variants: `git` folds into
//! [`Feature::Core`], `node-cjs` into [`Feature::Node`], `vite-react` into
//! [`Feature::Vite`].
//!
//! # Adding New Variants
//!
//! 1. Add the enum variant here
//! 2. Add the `as_str` arm and every name that maps to it in `from_name`
//! 3. Reference it from a schema node's `feature` gate

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A capability identifier. `Core` is implicitly always active.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    Core,
    Npm,
    Ts,
    Vitest,
    React,
    Node,
    Vite,
    Cue,
}

impl Feature {
    /// Every variant, in declaration order.
    pub const ALL: [Feature; 8] = [
        Self::Core,
        Self::Npm,
        Self::Ts,
        Self::Vitest,
        Self::React,
        Self::Node,
        Self::Vite,
        Self::Cue,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Npm => "npm",
            Self::Ts => "ts",
            Self::Vitest => "vitest",
            Self::React => "react",
            Self::Node => "node",
            Self::Vite => "vite",
            Self::Cue => "cue",
        }
    }

    /// Map a configuration feature name to its variant.
    ///
    /// Unknown names yield `None`; resolution treats that as a no-op rather
    /// than a failure.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "core" | "git" => Some(Self::Core),
            "npm" => Some(Self::Npm),
            "ts" => Some(Self::Ts),
            "vitest" => Some(Self::Vitest),
            "react" => Some(Self::React),
            "node" | "node-cjs" => Some(Self::Node),
            "vite" | "vite-react" => Some(Self::Vite),
            "cue" => Some(Self::Cue),
            _ => None,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s.to_ascii_lowercase().as_str()).ok_or_else(|| {
            DomainError::UnknownFeature {
                name: s.to_string(),
            }
        })
    }
}
