use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Voice the explain prompt asks the model to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Persona {
    /// Friendly professor explaining to a five year old.
    Simplifying,
    /// Precise, jargon-heavy technical communicator.
    Technical,
}

/// How the explain prompt treats retrieved context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContextPolicy {
    /// Context is offered as background; the model may answer regardless.
    Background,
    /// The model must use the context and refuse when none is available.
    RefuseWithoutContext,
}

/// Persona and context policy together select the explain prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptStyle {
    pub persona: Persona,
    pub context_policy: ContextPolicy,
}

/// The three wirings of the search → explain pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Simplifying persona, search always runs.
    #[default]
    Working,
    /// Technical persona, search always runs.
    Buggy,
    /// Simplifying persona that refuses without context; search is skipped
    /// for questions containing the flaky marker.
    Flaky,
}

impl Variant {
    /// All variants, in display order.
    pub const ALL: [Variant; 3] = [Variant::Working, Variant::Buggy, Variant::Flaky];

    /// Prompt style used by this variant's explain stage.
    pub fn prompt_style(&self) -> PromptStyle {
        match self {
            Variant::Working => PromptStyle {
                persona: Persona::Simplifying,
                context_policy: ContextPolicy::Background,
            },
            Variant::Buggy => PromptStyle {
                persona: Persona::Technical,
                context_policy: ContextPolicy::Background,
            },
            Variant::Flaky => PromptStyle {
                persona: Persona::Simplifying,
                context_policy: ContextPolicy::RefuseWithoutContext,
            },
        }
    }

    /// Whether this variant's search stage fails deliberately on the marker.
    pub fn has_flaky_search(&self) -> bool {
        matches!(self, Variant::Flaky)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Working => "working",
            Variant::Buggy => "buggy",
            Variant::Flaky => "flaky",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a variant name is not recognised.
#[derive(Debug, Clone, Error)]
#[error("Unknown pipeline variant '{0}'. Expected one of: working, buggy, flaky")]
pub struct UnknownVariant(pub String);

impl FromStr for Variant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "working" => Ok(Variant::Working),
            "buggy" => Ok(Variant::Buggy),
            "flaky" => Ok(Variant::Flaky),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}
