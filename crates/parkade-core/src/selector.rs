//! Spot selection strategies
//!
//! A selector looks at a manager's spot list and names the spot to hand out.
//! It only ever sees a shared slice: choosing and occupying are separate
//! steps and occupying belongs to the manager.

use std::{str::FromStr, sync::Arc};

use rand::seq::IteratorRandom;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::Spot;

/// Picks one available spot out of a candidate list
pub trait SpotSelector: Send + Sync {
    /// Index into `candidates` of the chosen spot, or `None` when no
    /// candidate is available.
    fn choose_spot(&self, candidates: &[Spot]) -> Option<usize>;
}

impl<F> SpotSelector for F
where
    F: Fn(&[Spot]) -> Option<usize> + Send + Sync,
{
    fn choose_spot(&self, candidates: &[Spot]) -> Option<usize> {
        self(candidates)
    }
}

/// Deterministic scan: the first available spot in list order
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstFreeSelector;

impl SpotSelector for FirstFreeSelector {
    fn choose_spot(&self, candidates: &[Spot]) -> Option<usize> {
        candidates.iter().position(Spot::is_available)
    }
}

/// Uniformly random choice among the available spots
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSpotSelector;

impl SpotSelector for RandomSpotSelector {
    fn choose_spot(&self, candidates: &[Spot]) -> Option<usize> {
        candidates
            .iter()
            .enumerate()
            .filter(|(_, spot)| spot.is_available())
            .map(|(index, _)| index)
            .choose(&mut rand::thread_rng())
    }
}

/// Selector names accepted in lot layouts
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum SelectorKind {
    #[default]
    FirstFree,
    Random,
}

impl SelectorKind {
    /// Instantiate the selector, shared by every manager in the building
    #[must_use]
    pub fn build(self) -> Arc<dyn SpotSelector> {
        match self {
            Self::FirstFree => Arc::new(FirstFreeSelector),
            Self::Random => Arc::new(RandomSpotSelector),
        }
    }

    /// Parse a selector name, reporting the accepted names on failure
    pub fn parse(s: &str) -> crate::Result<Self> {
        Self::from_str(s).map_err(|_| {
            crate::Error::InvalidConfig(format!(
                "Invalid spot selector: {s}. Must be one of: first-free, random"
            ))
        })
    }
}
