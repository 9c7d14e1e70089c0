use std::error::Error;
use std::path::Path;
use surfgrasp::{GraspConfig, GraspDetector};

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <cloud.xyz|cloud.json> <config.json>", args[0]);
        std::process::exit(2);
    }

    let cloud = surfgrasp::io::load_cloud(Path::new(&args[1]))?;
    let config = GraspConfig::from_json_file(Path::new(&args[2]))?;
    let mut detector = GraspDetector::with_config(config);

    // Relax the boundary gate once if nothing survives it.
    let mut result = detector.detect(&cloud);
    if result.status.is_recoverable() && detector.config().validate().is_ok() {
        detector.config_mut().boundary_threshold *= 0.5;
        println!(
            "{}; retrying with boundary_threshold = {}",
            result.status,
            detector.config().boundary_threshold
        );
        result = detector.detect(&cloud);
    }

    println!("Status: {}", result.status);
    for (rank, grasp) in result.ranked.iter().take(5).enumerate() {
        let f = &grasp.features;
        println!(
            "#{rank}: utility {:.3}  curvature {:.4}  boundary distance {:.4}",
            grasp.utility, f.curvature, f.min_distance
        );
    }
    if let Some(frame) = &result.canonical_frame {
        println!("Canonical frame centroid: {:?}", frame.centroid);
    }
    Ok(())
}
