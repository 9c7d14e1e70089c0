//! Detection configuration.
//!
//! All lengths are in the sensor's length unit (metres for the usual depth
//! cameras). Angles are in radians.

use std::f64::consts::{FRAC_PI_2, TAU};
use std::path::Path;

use crate::error::GraspError;

/// Flat parameter set for one detection call.
///
/// Construct with [`GraspConfig::default`] and override fields, or load a
/// partial JSON document with [`GraspConfig::from_json_file`]; missing fields
/// keep their defaults.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GraspConfig {
    /// Neighbourhood radius for normal and curvature estimation.
    pub suction_cup_radius: f64,
    /// Voxel leaf size used to thin the surface into the candidate pool.
    pub grasp_sample_radius: f64,
    /// Weight of the flatness term `1 - normalized_curvature`.
    pub curvature_weight: f64,
    /// Weight of the normalized boundary-distance term.
    pub boundary_weight: f64,
    /// Reserved. Validated and serialized, not used by the utility.
    pub curvature_threshold: f64,
    /// Candidates with `min_distance <= boundary_threshold` are rejected.
    pub boundary_threshold: f64,
    /// Neighbour count for boundary classification; `0` selects the radius search.
    pub boundary_detector_k: usize,
    /// Neighbour radius for boundary classification.
    pub boundary_detector_radius: f64,
    /// Angular gap above which a point is classified as boundary.
    pub boundary_detector_angle: f64,
    /// Extra roll about the frame's own x axis for the grip orientation.
    pub grip_roll_offset: f64,
    /// Viewpoint used to orient normals. `None` derives it from the centroid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewpoint: Option<[f64; 3]>,
    /// Optional cap on the number of ranked candidates returned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_candidates: Option<usize>,
}

impl Default for GraspConfig {
    fn default() -> Self {
        Self {
            suction_cup_radius: 0.025,
            grasp_sample_radius: 0.025,
            curvature_weight: 0.5,
            boundary_weight: 0.5,
            curvature_threshold: 0.1,
            boundary_threshold: 0.01,
            boundary_detector_k: 0,
            boundary_detector_radius: 0.03,
            boundary_detector_angle: FRAC_PI_2,
            grip_roll_offset: FRAC_PI_2,
            viewpoint: None,
            max_candidates: None,
        }
    }
}

impl GraspConfig {
    /// Parse a (partial) JSON configuration.
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Load a (partial) JSON configuration from disk.
    pub fn from_json_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let data = std::fs::read_to_string(path)?;
        Ok(Self::from_json_str(&data)?)
    }

    /// Check every parameter against its admissible range.
    pub fn validate(&self) -> Result<(), GraspError> {
        positive("suction_cup_radius", self.suction_cup_radius)?;
        positive("grasp_sample_radius", self.grasp_sample_radius)?;
        non_negative("curvature_weight", self.curvature_weight)?;
        non_negative("boundary_weight", self.boundary_weight)?;
        non_negative("curvature_threshold", self.curvature_threshold)?;
        non_negative("boundary_threshold", self.boundary_threshold)?;
        if self.boundary_detector_k == 0 {
            positive("boundary_detector_radius", self.boundary_detector_radius)?;
        } else {
            non_negative("boundary_detector_radius", self.boundary_detector_radius)?;
        }

        let angle = self.boundary_detector_angle;
        if !angle.is_finite() || angle <= 0.0 || angle >= TAU {
            return Err(GraspError::invalid_config(
                "boundary_detector_angle",
                format!("must lie in (0, 2π), got {}", angle),
            ));
        }
        if !self.grip_roll_offset.is_finite() {
            return Err(GraspError::invalid_config(
                "grip_roll_offset",
                "must be finite",
            ));
        }
        if let Some(vp) = self.viewpoint {
            if vp.iter().any(|v| !v.is_finite()) {
                return Err(GraspError::invalid_config("viewpoint", "must be finite"));
            }
        }
        if self.max_candidates == Some(0) {
            return Err(GraspError::invalid_config(
                "max_candidates",
                "must be at least 1 when set",
            ));
        }
        Ok(())
    }
}

fn positive(parameter: &'static str, value: f64) -> Result<(), GraspError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GraspError::invalid_config(
            parameter,
            format!("must be finite and > 0, got {}", value),
        ))
    }
}

fn non_negative(parameter: &'static str, value: f64) -> Result<(), GraspError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(GraspError::invalid_config(
            parameter,
            format!("must be finite and >= 0, got {}", value),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_stable() {
        let cfg = GraspConfig::default();
        assert!((cfg.suction_cup_radius - 0.025).abs() < 1e-12);
        assert!((cfg.grasp_sample_radius - 0.025).abs() < 1e-12);
        assert!((cfg.curvature_weight - 0.5).abs() < 1e-12);
        assert!((cfg.boundary_weight - 0.5).abs() < 1e-12);
        assert!((cfg.curvature_threshold - 0.1).abs() < 1e-12);
        assert!((cfg.boundary_threshold - 0.01).abs() < 1e-12);
        assert_eq!(cfg.boundary_detector_k, 0);
        assert!((cfg.boundary_detector_radius - 0.03).abs() < 1e-12);
        assert!((cfg.boundary_detector_angle - FRAC_PI_2).abs() < 1e-12);
        assert!(cfg.viewpoint.is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg =
            GraspConfig::from_json_str(r#"{"boundary_threshold": 0.02, "max_candidates": 5}"#)
                .unwrap();
        assert!((cfg.boundary_threshold - 0.02).abs() < 1e-12);
        assert_eq!(cfg.max_candidates, Some(5));
        assert!((cfg.curvature_weight - 0.5).abs() < 1e-12);
    }

    #[test]
    fn json_roundtrip_preserves_values() {
        let cfg = GraspConfig {
            viewpoint: Some([0.0, 0.0, 1.0]),
            ..Default::default()
        };
        let json = serde_json::to_string(&cfg).unwrap();
        assert_eq!(GraspConfig::from_json_str(&json).unwrap(), cfg);
    }

    #[test]
    fn rejects_negative_weight() {
        let cfg = GraspConfig {
            boundary_weight: -0.1,
            ..Default::default()
        };
        match cfg.validate() {
            Err(GraspError::InvalidConfig { parameter, .. }) => {
                assert_eq!(parameter, "boundary_weight")
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn radius_may_be_zero_when_k_is_used() {
        let cfg = GraspConfig {
            boundary_detector_k: 12,
            boundary_detector_radius: 0.0,
            ..Default::default()
        };
        assert!(cfg.validate().is_ok());

        let cfg = GraspConfig {
            boundary_detector_radius: 0.0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_angle_and_nan_radius() {
        let cfg = GraspConfig {
            boundary_detector_angle: 7.0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = GraspConfig {
            suction_cup_radius: f64::NAN,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = GraspConfig {
            max_candidates: Some(0),
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
