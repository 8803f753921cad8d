//! Container type classification module
//!
//! Maps a color profile to one label of a closed container set using
//! ordered threshold rules, and enforces the confidence floor.

pub mod container;
pub mod rules;

pub use container::ContainerType;
pub use rules::{apply_confidence_floor, Classification, ColorSummary, MatchedRule, TypeClassifier};
