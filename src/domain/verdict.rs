use serde::{Serialize, Serializer};
use std::fmt;

/// Two vertex indices whose separation met the landing target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Diagonal {
    pub from: usize,
    pub to: usize,
    /// Distance between the two vertices in meters
    pub length_m: f64,
}

/// Outcome of the landability search for one polygon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LandabilityVerdict {
    /// No vertex pair outside the pruning window reaches the target.
    Fails,
    /// A qualifying diagonal was found.
    Passes(Diagonal),
    /// A single edge is already at least as long as the target, so the
    /// pruning bound is zero and the outline is too coarse to judge.
    PassesLowResolution,
}

impl LandabilityVerdict {
    /// Label used in result tables.
    pub fn label(&self) -> &'static str {
        match self {
            LandabilityVerdict::Fails => "Fails",
            LandabilityVerdict::Passes(_) => "Passes",
            LandabilityVerdict::PassesLowResolution => "Passes*",
        }
    }

    /// True only for a proven diagonal.
    pub fn is_pass(&self) -> bool {
        matches!(self, LandabilityVerdict::Passes(_))
    }

    pub fn is_low_resolution(&self) -> bool {
        matches!(self, LandabilityVerdict::PassesLowResolution)
    }

    pub fn diagonal(&self) -> Option<&Diagonal> {
        match self {
            LandabilityVerdict::Passes(d) => Some(d),
            _ => None,
        }
    }
}

impl fmt::Display for LandabilityVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for LandabilityVerdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        let pass = LandabilityVerdict::Passes(Diagonal {
            from: 0,
            to: 2,
            length_m: 700.0,
        });
        assert_eq!(pass.label(), "Passes");
        assert_eq!(LandabilityVerdict::Fails.label(), "Fails");
        assert_eq!(LandabilityVerdict::PassesLowResolution.to_string(), "Passes*");
    }

    #[test]
    fn test_low_resolution_is_not_a_proven_pass() {
        let v = LandabilityVerdict::PassesLowResolution;
        assert!(!v.is_pass());
        assert!(v.is_low_resolution());
        assert!(v.diagonal().is_none());
    }
}
