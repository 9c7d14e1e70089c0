//! High-level detection API.
//!
//! [`GraspDetector`] is the primary entry point for ranking grasp candidates.
//! It wraps a [`GraspConfig`] and a [`SurfaceGeometry`] implementation and
//! provides convenience methods for the common call patterns.

use std::path::Path;

use nalgebra::Point3;

use crate::cloud::{sanitize, SurfacePoint};
use crate::config::GraspConfig;
use crate::detector::{align_canonical_frame, CanonicalFrame};
use crate::error::GraspError;
use crate::geometry::{IndexedGeometry, SurfaceGeometry};
use crate::pipeline::{self, GraspDetection, RankedGrasp};

/// Primary detection interface.
///
/// Create once, detect on many clouds. Each call builds its own spatial
/// indices, so a shared detector can serve concurrent callers.
///
/// # Examples
///
/// ```no_run
/// use surfgrasp::{GraspConfig, GraspDetector};
///
/// let mut detector = GraspDetector::with_config(GraspConfig::default());
/// detector.config_mut().boundary_threshold = 0.015;
///
/// let cloud: Vec<[f64; 3]> = vec![[0.0, 0.0, 0.5]; 10];
/// let result = detector.detect(&cloud);
/// println!("{}: {} grasps", result.status, result.ranked.len());
/// ```
#[derive(Debug, Clone)]
pub struct GraspDetector<G = IndexedGeometry> {
    config: GraspConfig,
    geometry: G,
}

impl GraspDetector {
    /// Create a detector with default configuration and bundled geometry.
    pub fn new() -> Self {
        Self::with_config(GraspConfig::default())
    }

    /// Create with full config control.
    pub fn with_config(config: GraspConfig) -> Self {
        Self {
            config,
            geometry: IndexedGeometry,
        }
    }

    /// Load a (partial) JSON config and create a detector in one step.
    pub fn from_config_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self::with_config(GraspConfig::from_json_file(path)?))
    }
}

impl Default for GraspDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: SurfaceGeometry> GraspDetector<G> {
    /// Use a different geometry backend (e.g. a wrapper around an existing
    /// point-cloud library).
    pub fn with_geometry(config: GraspConfig, geometry: G) -> Self {
        Self { config, geometry }
    }

    /// Access the current configuration.
    pub fn config(&self) -> &GraspConfig {
        &self.config
    }

    /// Mutable access to configuration for post-construction tuning.
    pub fn config_mut(&mut self) -> &mut GraspConfig {
        &mut self.config
    }

    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    /// Rank grasps on a raw cloud. Failures are reported in the status.
    pub fn detect(&self, cloud: &[[f64; 3]]) -> GraspDetection {
        pipeline::detect_with(&self.geometry, cloud, &self.config)
    }

    /// Rank grasps on a raw cloud, returning stage errors.
    pub fn try_detect(&self, cloud: &[[f64; 3]]) -> Result<GraspDetection, GraspError> {
        pipeline::try_detect_with(&self.geometry, cloud, &self.config)
    }

    /// Rank grasps from precomputed normals and boundary flags.
    pub fn detect_from_surface(
        &self,
        surface: &[SurfacePoint],
        boundary_mask: &[bool],
        cloud: &[[f64; 3]],
    ) -> GraspDetection {
        pipeline::detect_from_surface_with(
            &self.geometry,
            surface,
            boundary_mask,
            cloud,
            &self.config,
        )
    }

    /// Rank `samples` against an explicit boundary set.
    pub fn rank_candidates(
        &self,
        samples: &[SurfacePoint],
        boundary_points: &[Point3<f64>],
    ) -> Result<Vec<RankedGrasp>, GraspError> {
        pipeline::rank_candidates(samples, boundary_points, &self.config)
    }

    /// Canonical frame of a raw cloud alone, without ranking.
    pub fn canonical_frame(&self, cloud: &[[f64; 3]]) -> Result<CanonicalFrame, GraspError> {
        self.config.validate()?;
        let points = sanitize(cloud);
        let frame = align_canonical_frame(&points, &self.geometry, self.config.grip_roll_offset)?;
        Ok(frame.to_canonical())
    }
}
