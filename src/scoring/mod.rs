pub mod grade;
pub mod normalize;
pub mod procrustes;

pub use grade::MatchScore;
pub use normalize::{normalize, NormalizedPose};
pub use procrustes::{align, aligned_similarity, score_detection, similarity, Alignment};
