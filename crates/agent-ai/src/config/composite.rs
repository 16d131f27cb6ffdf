use behavior_tree::BoxedTask;
use behavior_tree::builder::{
    parallel, progressive_sequence, race, selector, selector_with_running, sequence,
};
use serde::{Deserialize, Serialize};

use super::{BehaviorConfig, BuildContext};
use crate::clock::Frame;
use crate::error::{BehaviorError, Result};

/// Control-flow policy of a [`MultiConfig`].
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CompositeKind {
    Sequence,
    Selector,
    SelectorWithRunning,
    Parallel,
    Race,
    ProgressiveSequence,
}

impl CompositeKind {
    /// Parses a tag such as `"selector_with_running"`.
    pub fn from_tag(tag: &str) -> Result<Self> {
        tag.parse()
            .map_err(|_| BehaviorError::invalid(format!("unknown composite kind `{tag}`")))
    }
}

/// A composite node over child configs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiConfig {
    pub mode: CompositeKind,
    pub children: Vec<BehaviorConfig>,
}

impl MultiConfig {
    pub fn new(mode: CompositeKind, children: Vec<BehaviorConfig>) -> Self {
        Self { mode, children }
    }

    pub(super) fn build(&self, ctx: &BuildContext) -> Result<BoxedTask<Frame>> {
        if self.children.is_empty() {
            return Err(BehaviorError::invalid(format!(
                "{} composite must have at least one child",
                self.mode
            )));
        }

        let children = self
            .children
            .iter()
            .map(|child| child.build(ctx))
            .collect::<Result<Vec<_>>>()?;

        Ok(match self.mode {
            CompositeKind::Sequence => sequence(children),
            CompositeKind::Selector => selector(children),
            CompositeKind::SelectorWithRunning => selector_with_running(children),
            CompositeKind::Parallel => parallel(children),
            CompositeKind::Race => race(children),
            CompositeKind::ProgressiveSequence => progressive_sequence(children),
        })
    }
}
