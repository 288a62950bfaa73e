// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

pub mod error;
pub mod mood;
pub mod catalog;
pub mod inference;
pub mod chat;
pub mod config;

pub use catalog::{AgeGroupInfo, MoodRecord};
pub use config::{ExperienceConfig, SessionSettings};
pub use error::{SerenityError, UnknownMoodError};
pub use inference::{infer, InferenceRule, RULE_TABLE_VERSION};
pub use mood::{AgeGroup, Mood};
