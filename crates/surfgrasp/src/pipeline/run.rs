//! Top-level orchestrator: geometry → sample → filter → score → rank → frame.

use nalgebra::Point3;

use super::result::{DetectionStats, GraspDetection, RankedGrasp};
use crate::cloud::{derive_viewpoint, sanitize, SurfacePoint};
use crate::config::GraspConfig;
use crate::detector::{
    align_canonical_frame, filter_candidates, rank_by_utility, sample_candidates,
    score_candidates, BoundaryCloud, CurvatureRange, UtilityWeights,
};
use crate::error::{DetectionStatus, GraspError};
use crate::geometry::{IndexedGeometry, SurfaceGeometry};

// ---------------------------------------------------------------------------
// Stage chains
// ---------------------------------------------------------------------------

/// Sample → filter → score → rank, then cap the list.
fn rank_samples(
    samples: &[SurfacePoint],
    boundary: &BoundaryCloud,
    config: &GraspConfig,
    stats: &mut DetectionStats,
) -> Result<Vec<RankedGrasp>, GraspError> {
    stats.samples = samples.len();
    let pool = sample_candidates(samples)?;

    let outcome = filter_candidates(&pool, boundary, config.boundary_threshold).map_err(|e| {
        if matches!(e, GraspError::NoCandidatesSurvived { .. }) {
            stats.rejected = pool.len();
        }
        e
    })?;
    stats.rejected = outcome.n_rejected;

    // Extrema over the whole pool, not just the survivors.
    let range = CurvatureRange::from_samples(&pool.curvatures)
        .unwrap_or(CurvatureRange { min: 0.0, max: 0.0 });
    let weights = UtilityWeights {
        curvature: config.curvature_weight,
        boundary: config.boundary_weight,
    };
    let scored = score_candidates(&outcome.survivors, &range, weights);
    stats.scored = scored.len();

    let mut ranked = rank_by_utility(scored);
    if let Some(max) = config.max_candidates {
        ranked.truncate(max);
    }
    Ok(ranked.iter().map(RankedGrasp::from).collect())
}

fn run_from_surface<G: SurfaceGeometry + ?Sized>(
    geometry: &G,
    surface: &[SurfacePoint],
    boundary_mask: &[bool],
    cloud: &[Point3<f64>],
    config: &GraspConfig,
    stats: &mut DetectionStats,
) -> Result<GraspDetection, GraspError> {
    stats.surface_points = surface.iter().filter(|sp| sp.is_finite()).count();
    if boundary_mask.len() != surface.len() {
        tracing::warn!(
            n_surface = surface.len(),
            n_mask = boundary_mask.len(),
            "boundary mask length does not match surface"
        );
    }
    let boundary = BoundaryCloud::from_mask(surface, boundary_mask);
    stats.boundary_points = boundary.len();

    let samples = geometry.downsample(surface, config.grasp_sample_radius);
    let ranked = rank_samples(&samples, &boundary, config, stats)?;
    let frame = align_canonical_frame(cloud, geometry, config.grip_roll_offset)?;
    stats.returned = ranked.len();

    tracing::info!(
        n_input = stats.input_points,
        n_boundary = stats.boundary_points,
        n_samples = stats.samples,
        n_rejected = stats.rejected,
        n_returned = stats.returned,
        "grasp detection complete"
    );
    Ok(GraspDetection {
        status: DetectionStatus::Ok,
        ranked,
        canonical_frame: Some(frame.to_canonical()),
        stats: *stats,
    })
}

fn run_full<G: SurfaceGeometry + ?Sized>(
    geometry: &G,
    raw: &[[f64; 3]],
    config: &GraspConfig,
    stats: &mut DetectionStats,
) -> Result<GraspDetection, GraspError> {
    stats.input_points = raw.len();
    config.validate()?;

    let cloud = sanitize(raw);
    stats.finite_points = cloud.len();
    if cloud.is_empty() {
        tracing::warn!(n_input = raw.len(), "no finite points in input cloud");
        return Err(GraspError::InsufficientPoints {
            stage: "input sanitation",
        });
    }
    if cloud.len() < raw.len() {
        tracing::debug!(n_dropped = raw.len() - cloud.len(), "dropped non-finite points");
    }

    let viewpoint = config
        .viewpoint
        .map(Point3::from)
        .unwrap_or_else(|| derive_viewpoint(&cloud));
    tracing::debug!(viewpoint = ?viewpoint.coords.as_slice(), "normal orientation viewpoint");

    let surface = geometry.estimate_normals(&cloud, &viewpoint, config.suction_cup_radius);
    let mask = geometry.classify_boundary(
        &surface,
        config.boundary_detector_k,
        config.boundary_detector_radius,
        config.boundary_detector_angle,
    );
    run_from_surface(geometry, &surface, &mask, &cloud, config, stats)
}

fn fold(result: Result<GraspDetection, GraspError>, stats: DetectionStats) -> GraspDetection {
    result.unwrap_or_else(|err| {
        tracing::warn!(status = %err.status(), "grasp detection failed: {}", err);
        GraspDetection::failed(err.status(), stats)
    })
}

// ---------------------------------------------------------------------------
// Generic entry points (used by `GraspDetector`)
// ---------------------------------------------------------------------------

pub(crate) fn try_detect_with<G: SurfaceGeometry + ?Sized>(
    geometry: &G,
    cloud: &[[f64; 3]],
    config: &GraspConfig,
) -> Result<GraspDetection, GraspError> {
    let mut stats = DetectionStats::default();
    run_full(geometry, cloud, config, &mut stats)
}

pub(crate) fn detect_with<G: SurfaceGeometry + ?Sized>(
    geometry: &G,
    cloud: &[[f64; 3]],
    config: &GraspConfig,
) -> GraspDetection {
    let mut stats = DetectionStats::default();
    let result = run_full(geometry, cloud, config, &mut stats);
    fold(result, stats)
}

pub(crate) fn detect_from_surface_with<G: SurfaceGeometry + ?Sized>(
    geometry: &G,
    surface: &[SurfacePoint],
    boundary_mask: &[bool],
    cloud: &[[f64; 3]],
    config: &GraspConfig,
) -> GraspDetection {
    let mut stats = DetectionStats {
        input_points: cloud.len(),
        ..DetectionStats::default()
    };
    let result = config.validate().and_then(|()| {
        let cloud = sanitize(cloud);
        stats.finite_points = cloud.len();
        if cloud.is_empty() {
            return Err(GraspError::InsufficientPoints {
                stage: "input sanitation",
            });
        }
        run_from_surface(geometry, surface, boundary_mask, &cloud, config, &mut stats)
    });
    fold(result, stats)
}

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Detect and rank grasp candidates on a raw cloud with the bundled geometry.
///
/// Never fails: any stage error is reported through
/// [`GraspDetection::status`] together with an empty ranked list.
pub fn detect_grasp_candidates(cloud: &[[f64; 3]], config: &GraspConfig) -> GraspDetection {
    detect_with(&IndexedGeometry, cloud, config)
}

/// Like [`detect_grasp_candidates`], but stage errors are returned.
pub fn try_detect_grasp_candidates(
    cloud: &[[f64; 3]],
    config: &GraspConfig,
) -> Result<GraspDetection, GraspError> {
    try_detect_with(&IndexedGeometry, cloud, config)
}

/// Run the pipeline on collaborator outputs the caller already has.
///
/// `surface` holds per-point normals and curvature, `boundary_mask` flags its
/// boundary points (index-aligned) and `cloud` is the full cloud used for the
/// canonical frame.
pub fn detect_from_surface(
    surface: &[SurfacePoint],
    boundary_mask: &[bool],
    cloud: &[[f64; 3]],
    config: &GraspConfig,
) -> GraspDetection {
    detect_from_surface_with(&IndexedGeometry, surface, boundary_mask, cloud, config)
}

/// Rank `samples` directly against a boundary point set, skipping geometry
/// estimation, thinning and the canonical frame.
pub fn rank_candidates(
    samples: &[SurfacePoint],
    boundary_points: &[Point3<f64>],
    config: &GraspConfig,
) -> Result<Vec<RankedGrasp>, GraspError> {
    config.validate()?;
    let boundary = BoundaryCloud::from_points(boundary_points);
    let mut stats = DetectionStats::default();
    rank_samples(samples, &boundary, config, &mut stats)
}
