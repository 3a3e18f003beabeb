use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::keypoint::Keypoint;

// --- Save / Load ---

/// JSON 配列 `[{"x":..,"y":..,"score":..}, ...]` を読み込む
pub fn parse_keypoints(json: &str) -> Result<Vec<Keypoint>> {
    let keypoints: Vec<Keypoint> =
        serde_json::from_str(json).context("Failed to parse keypoint JSON")?;
    Ok(keypoints)
}

pub fn load_keypoints<P: AsRef<Path>>(path: P) -> Result<Vec<Keypoint>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read pose file {}", path.display()))?;
    parse_keypoints(&content)
}

pub fn save_keypoints<P: AsRef<Path>>(path: P, keypoints: &[Keypoint]) -> Result<()> {
    let json = serde_json::to_string_pretty(keypoints)?;
    fs::write(path.as_ref(), json).context("Failed to write pose file")?;
    Ok(())
}
