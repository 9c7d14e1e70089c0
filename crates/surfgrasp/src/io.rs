//! Point-cloud file loading.
//!
//! Supported layouts:
//! - `.json`: `{"points": [[x, y, z], ...]}` or a bare array of triples
//! - `.xyz` / `.txt` / `.pts` (and anything else): whitespace-separated text,
//!   one point per line; `#` starts a comment, extra columns are ignored

use std::path::Path;

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum CloudDocument {
    Object { points: Vec<[f64; 3]> },
    Bare(Vec<[f64; 3]>),
}

/// Parse a JSON cloud document.
pub fn parse_json_cloud(raw: &str) -> Result<Vec<[f64; 3]>, serde_json::Error> {
    let doc: CloudDocument = serde_json::from_str(raw)?;
    Ok(match doc {
        CloudDocument::Object { points } => points,
        CloudDocument::Bare(points) => points,
    })
}

/// Parse whitespace-separated `x y z` lines.
pub fn parse_xyz_cloud(raw: &str) -> Result<Vec<[f64; 3]>, String> {
    let mut points = Vec::new();
    for (lineno, line) in raw.lines().enumerate() {
        let content = line.split('#').next().unwrap_or_default().trim();
        if content.is_empty() {
            continue;
        }
        let mut fields = content.split_whitespace();
        let mut xyz = [0.0f64; 3];
        for (axis, slot) in xyz.iter_mut().enumerate() {
            let field = fields
                .next()
                .ok_or_else(|| format!("line {}: expected 3 columns", lineno + 1))?;
            *slot = field.parse().map_err(|e| {
                format!(
                    "line {}: column {} ('{}'): {}",
                    lineno + 1,
                    axis + 1,
                    field,
                    e
                )
            })?;
        }
        points.push(xyz);
    }
    Ok(points)
}

/// Load a cloud, choosing the parser from the file extension.
pub fn load_cloud(path: &Path) -> Result<Vec<[f64; 3]>, Box<dyn std::error::Error>> {
    let data = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let points = if is_json {
        parse_json_cloud(&data)?
    } else {
        parse_xyz_cloud(&data)?
    };
    tracing::debug!(path = %path.display(), n_points = points.len(), "loaded cloud");
    Ok(points)
}
