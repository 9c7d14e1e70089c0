use std::error::Error;
use std::path::Path;
use surfgrasp::GraspDetector;

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <cloud.xyz|cloud.json> [out.json]", args[0]);
        std::process::exit(2);
    }

    let cloud = surfgrasp::io::load_cloud(Path::new(&args[1]))?;
    let detector = GraspDetector::new();
    let result = detector.detect(&cloud);

    println!(
        "Status: {} ({} grasps from {} points).",
        result.status,
        result.ranked.len(),
        cloud.len()
    );
    if let Some(best) = result.best() {
        println!(
            "Best: utility {:.3} at [{:.4}, {:.4}, {:.4}]",
            best.utility, best.pose.position[0], best.pose.position[1], best.pose.position[2]
        );
    }

    if let Some(out_path) = args.get(2) {
        let json = serde_json::to_string_pretty(&result)?;
        std::fs::write(out_path, json)?;
        println!("Wrote {out_path}");
    }
    Ok(())
}
