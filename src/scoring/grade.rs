/// 表示用スコア
///
/// - `percentage`: round(max(0, similarity) * 100), 0〜100 (高いほど一致)
/// - `distance`: 100 - percentage (低いほど一致)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchScore {
    pub similarity: f32,
    pub percentage: u8,
    pub distance: u8,
}

impl MatchScore {
    pub fn from_similarity(similarity: f32) -> Self {
        let clamped = (similarity as f64).max(0.0).min(1.0);
        let percentage = (clamped * 100.0).round() as u8;
        Self {
            similarity,
            percentage,
            distance: 100 - percentage,
        }
    }
}
