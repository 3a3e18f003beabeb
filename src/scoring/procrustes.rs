//! 2D orthogonal Procrustes alignment (rotation only, no reflection).

use crate::pose::Keypoint;

use super::normalize::{normalize, NormalizedPose};

/// Floor for the rotation denominator and the final cosine denominator.
pub const DENOM_EPSILON: f64 = 1e-6;

/// Best-fit rotation taking the user vector onto the target vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Alignment {
    pub cos_theta: f64,
    pub sin_theta: f64,
}

impl Alignment {
    /// Rotation angle in radians, counter-clockwise in image coordinates.
    pub fn angle(&self) -> f64 {
        self.sin_theta.atan2(self.cos_theta)
    }

    pub fn rotate(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.cos_theta * x - self.sin_theta * y,
            self.sin_theta * x + self.cos_theta * y,
        )
    }
}

/// Closed-form rotation from the 2x2 cross-covariance of the two vectors.
///
/// `denom = hypot(sxx + syy, sxy - syx)`, floored at 1e-6. When the
/// cross-covariance vanishes the result is not a unit rotation and the
/// aligned user vector collapses towards zero.
pub fn align(user: &NormalizedPose, target: &NormalizedPose) -> Alignment {
    let mut sxx = 0.0;
    let mut sxy = 0.0;
    let mut syx = 0.0;
    let mut syy = 0.0;
    for ((ux, uy), (tx, ty)) in user.points().zip(target.points()) {
        sxx += ux * tx;
        sxy += ux * ty;
        syx += uy * tx;
        syy += uy * ty;
    }

    let denom = (sxx + syy).hypot(sxy - syx).max(DENOM_EPSILON);
    Alignment {
        cos_theta: (sxx + syy) / denom,
        sin_theta: (sxy - syx) / denom,
    }
}

/// Cosine similarity of two normalized vectors after aligning `user` onto `target`.
///
/// Returns `None` when the vectors have different lengths.
pub fn aligned_similarity(user: &NormalizedPose, target: &NormalizedPose) -> Option<f64> {
    if user.len() != target.len() {
        return None;
    }

    let rotation = align(user, target);

    let mut dot = 0.0;
    let mut user_norm = 0.0;
    let mut target_norm = 0.0;
    for ((ux, uy), (tx, ty)) in user.points().zip(target.points()) {
        let (rx, ry) = rotation.rotate(ux, uy);
        dot += rx * tx + ry * ty;
        user_norm += rx * rx + ry * ry;
        target_norm += tx * tx + ty * ty;
    }

    let denom = (user_norm * target_norm).sqrt().max(DENOM_EPSILON);
    Some(dot / denom)
}

/// Pose similarity in roughly [-1, 1]; 1 means the same shape up to
/// translation, uniform scale and rotation.
///
/// The user pose is rotated onto the target, so the two arguments are not
/// interchangeable in general. Empty input or mismatched keypoint counts
/// score 0. Never panics.
pub fn similarity(user: &[Keypoint], target: &[Keypoint]) -> f32 {
    let (Some(user_vec), Some(target_vec)) = (normalize(user), normalize(target)) else {
        return 0.0;
    };
    aligned_similarity(&user_vec, &target_vec).unwrap_or(0.0) as f32
}

/// Like [`similarity`], for a detector that may not have produced a pose.
pub fn score_detection(user: Option<&[Keypoint]>, target: &[Keypoint]) -> f32 {
    user.map_or(0.0, |u| similarity(u, target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::PoseName;

    fn transform(points: &[Keypoint], f: impl Fn(f32, f32) -> (f32, f32)) -> Vec<Keypoint> {
        points
            .iter()
            .map(|k| {
                let (x, y) = f(k.x, k.y);
                Keypoint::new(x, y, k.score)
            })
            .collect()
    }

    fn centroid(points: &[Keypoint]) -> (f32, f32) {
        let n = points.len() as f32;
        let x = points.iter().map(|k| k.x).sum::<f32>() / n;
        let y = points.iter().map(|k| k.y).sum::<f32>() / n;
        (x, y)
    }

    fn t_pose() -> &'static [Keypoint] {
        PoseName::TPose.pose().as_slice()
    }

    #[test]
    fn test_t_pose_self_similarity() {
        let s = similarity(t_pose(), t_pose());
        assert!((s - 1.0).abs() < 1e-6, "similarity = {}", s);
    }

    #[test]
    fn test_self_similarity_all_library_poses() {
        for name in PoseName::ALL {
            let p = name.pose().as_slice();
            let s = similarity(p, p);
            assert!((s - 1.0).abs() < 1e-6, "{}: {}", name, s);
        }
    }

    #[test]
    fn test_translation_invariance() {
        for &(dx, dy) in &[(0.3, -0.2), (-0.45, 0.6), (2.0, 3.0)] {
            let moved = transform(t_pose(), |x, y| (x + dx, y + dy));
            let s = similarity(&moved, t_pose());
            assert!((s - 1.0).abs() < 1e-4, "offset ({}, {}): {}", dx, dy, s);
        }
    }

    #[test]
    fn test_scale_invariance() {
        for &k in &[0.25, 0.5, 3.0, 10.0] {
            let scaled = transform(t_pose(), |x, y| (x * k, y * k));
            let s = similarity(&scaled, t_pose());
            assert!((s - 1.0).abs() < 1e-4, "k = {}: {}", k, s);
        }
    }

    #[test]
    fn test_uniform_scale_about_centroid() {
        let (cx, cy) = centroid(t_pose());
        let scaled = transform(t_pose(), |x, y| (cx + 2.0 * (x - cx), cy + 2.0 * (y - cy)));
        let s = similarity(&scaled, t_pose());
        assert!((s - 1.0).abs() < 1e-3, "similarity = {}", s);
    }

    #[test]
    fn test_vertical_stretch_changes_shape() {
        // y だけの拡大はアスペクト比が変わるので 1 にはならない
        let (_, cy) = centroid(t_pose());
        let stretched = transform(t_pose(), |x, y| (x, cy + 2.0 * (y - cy)));
        let s = similarity(&stretched, t_pose());
        assert!((s - 0.9724).abs() < 1e-3, "similarity = {}", s);
    }

    #[test]
    fn test_rotation_invariance() {
        let (cx, cy) = centroid(t_pose());
        for &deg in &[15.0f32, 45.0, 90.0, 135.0, 180.0, -60.0] {
            let (s, c) = deg.to_radians().sin_cos();
            let rotated = transform(t_pose(), |x, y| {
                let (dx, dy) = (x - cx, y - cy);
                (cx + c * dx - s * dy, cy + s * dx + c * dy)
            });
            let sim = similarity(&rotated, t_pose());
            assert!((sim - 1.0).abs() < 1e-4, "{} deg: {}", deg, sim);
        }
    }

    #[test]
    fn test_align_recovers_rotation_angle() {
        let (cx, cy) = centroid(t_pose());
        let angle = 30.0f32.to_radians();
        let (s, c) = angle.sin_cos();
        let rotated = transform(t_pose(), |x, y| {
            let (dx, dy) = (x - cx, y - cy);
            (cx + c * dx - s * dy, cy + s * dx + c * dy)
        });
        let user = normalize(&rotated).unwrap();
        let target = normalize(t_pose()).unwrap();
        let alignment = align(&user, &target);
        assert!((alignment.angle() + angle as f64).abs() < 1e-4, "angle = {}", alignment.angle());
    }

    #[test]
    fn test_reflection_not_compensated() {
        let (_, cy) = centroid(t_pose());
        let flipped = transform(t_pose(), |x, y| (x, 2.0 * cy - y));
        let s = similarity(&flipped, t_pose());
        assert!(s < 0.6, "mirrored pose should not align: {}", s);
    }

    #[test]
    fn test_different_poses_score_lower() {
        let s = similarity(PoseName::Victory.pose().as_slice(), t_pose());
        assert!((s - 0.9035).abs() < 1e-3, "similarity = {}", s);
        let s = similarity(PoseName::Archer.pose().as_slice(), PoseName::Warrior.pose().as_slice());
        assert!(s < 0.99 && s > 0.97, "similarity = {}", s);
    }

    #[test]
    fn test_both_directions_compared_explicitly() {
        // ユーザー側を回転させる定義なので引数は入れ替え可能とは限らない。
        // 通常の姿勢では両方向が一致することだけ確認する。
        for a in PoseName::ALL {
            for b in PoseName::ALL {
                let ab = similarity(a.pose().as_slice(), b.pose().as_slice());
                let ba = similarity(b.pose().as_slice(), a.pose().as_slice());
                assert!((ab - ba).abs() < 1e-5, "{} vs {}: {} / {}", a, b, ab, ba);
            }
        }
    }

    #[test]
    fn test_low_confidence_joints_weigh_less() {
        let mut wrong = PoseName::TPose.pose().keypoints;
        for i in [9, 10] {
            wrong[i] = Keypoint::new(0.5, 0.9, 1.0);
        }
        let trusted = similarity(&wrong, t_pose());

        for i in [9, 10] {
            wrong[i].score = 0.05;
        }
        let doubted = similarity(&wrong, t_pose());
        assert!(doubted > trusted, "{} should exceed {}", doubted, trusted);
    }

    #[test]
    fn test_empty_scores_zero() {
        assert_eq!(similarity(&[], t_pose()), 0.0);
        assert_eq!(similarity(t_pose(), &[]), 0.0);
        assert_eq!(score_detection(None, t_pose()), 0.0);
        assert_eq!(score_detection(Some(&[]), t_pose()), 0.0);
    }

    #[test]
    fn test_length_mismatch_scores_zero() {
        assert_eq!(similarity(&t_pose()[..10], t_pose()), 0.0);
        assert_eq!(similarity(t_pose(), &t_pose()[..10]), 0.0);
    }

    #[test]
    fn test_coincident_points_score_zero() {
        let collapsed = vec![Keypoint::new(0.5, 0.25, 1.0); 17];
        let s = similarity(&collapsed, t_pose());
        assert!(s.is_finite());
        assert_eq!(s, 0.0);
    }
}
