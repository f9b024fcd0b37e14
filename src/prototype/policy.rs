//! What to do when the selected shape index is past the end of the list.

use serde::{Deserialize, Serialize};

/// Recovery policy for an out-of-range shape selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeIndexPolicy {
    /// Use the first shape in the list.
    FallbackToFirst,
    /// Use the last shape in the list.
    Clamp,
    /// Leave the current child in place and only refresh its overrides.
    #[default]
    KeepPrevious,
    /// Do nothing at all.
    Skip,
}

/// Resolved action for one resync.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeChoice {
    Use(usize),
    KeepPrevious,
    Skip,
}

impl ShapeIndexPolicy {
    /// Resolve `index` against a non-empty list of `len` shapes.
    pub fn resolve(self, index: usize, len: usize) -> ShapeChoice {
        if index < len {
            return ShapeChoice::Use(index);
        }
        match self {
            ShapeIndexPolicy::FallbackToFirst => ShapeChoice::Use(0),
            ShapeIndexPolicy::Clamp => ShapeChoice::Use(len.saturating_sub(1)),
            ShapeIndexPolicy::KeepPrevious => ShapeChoice::KeepPrevious,
            ShapeIndexPolicy::Skip => ShapeChoice::Skip,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_range_ignores_policy() {
        for policy in [
            ShapeIndexPolicy::FallbackToFirst,
            ShapeIndexPolicy::Clamp,
            ShapeIndexPolicy::KeepPrevious,
            ShapeIndexPolicy::Skip,
        ] {
            assert_eq!(policy.resolve(1, 3), ShapeChoice::Use(1));
        }
    }

    #[test]
    fn test_out_of_range_resolution() {
        assert_eq!(ShapeIndexPolicy::FallbackToFirst.resolve(5, 3), ShapeChoice::Use(0));
        assert_eq!(ShapeIndexPolicy::Clamp.resolve(5, 3), ShapeChoice::Use(2));
        assert_eq!(ShapeIndexPolicy::KeepPrevious.resolve(5, 3), ShapeChoice::KeepPrevious);
        assert_eq!(ShapeIndexPolicy::Skip.resolve(3, 3), ShapeChoice::Skip);
    }

    #[test]
    fn test_default_keeps_previous() {
        assert_eq!(ShapeIndexPolicy::default(), ShapeIndexPolicy::KeepPrevious);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&ShapeIndexPolicy::FallbackToFirst).unwrap();
        assert_eq!(json, "\"fallback_to_first\"");
        let parsed: ShapeIndexPolicy = serde_json::from_str("\"clamp\"").unwrap();
        assert_eq!(parsed, ShapeIndexPolicy::Clamp);
    }
}
