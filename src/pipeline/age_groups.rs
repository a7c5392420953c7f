// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Age bracket definitions matching the generalist classifier's classes

use serde::{Deserialize, Serialize};

/// Number of output classes of the generalist classifier
pub const NUM_AGE_GROUPS: usize = 4;

/// Age brackets the generalist model classifies into.
///
/// Class indices follow the label encoder used at training time, which
/// ordered the labels alphabetically: Child, MiddleAge, Senior, YoungAdult.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeGroup {
    Child,
    MiddleAge,
    Senior,
    YoungAdult,
}

impl AgeGroup {
    /// All groups in class-index order
    pub const ALL: [AgeGroup; NUM_AGE_GROUPS] = [
        AgeGroup::Child,
        AgeGroup::MiddleAge,
        AgeGroup::Senior,
        AgeGroup::YoungAdult,
    ];

    /// Map a classifier output index to its bracket
    pub fn from_class_index(index: usize) -> Option<AgeGroup> {
        Self::ALL.get(index).copied()
    }

    /// The classifier output index for this bracket
    pub fn class_index(&self) -> usize {
        Self::ALL.iter().position(|g| g == self).unwrap_or(0)
    }

    /// Inclusive age bounds of this bracket
    pub fn bounds(&self) -> (u32, u32) {
        match self {
            AgeGroup::Child => (1, 17),
            AgeGroup::YoungAdult => (18, 35),
            AgeGroup::MiddleAge => (36, 55),
            AgeGroup::Senior => (56, 90),
        }
    }

    /// Display label used in API responses
    pub fn label(&self) -> &'static str {
        match self {
            AgeGroup::Child => "Child",
            AgeGroup::YoungAdult => "YoungAdult",
            AgeGroup::MiddleAge => "MiddleAge",
            AgeGroup::Senior => "Senior",
        }
    }

    /// One-hot encoding of this bracket, fed to the specialist model
    pub fn one_hot(&self) -> [f32; NUM_AGE_GROUPS] {
        let mut encoding = [0.0; NUM_AGE_GROUPS];
        encoding[self.class_index()] = 1.0;
        encoding
    }
}
