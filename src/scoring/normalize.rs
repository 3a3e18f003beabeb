use crate::pose::Keypoint;

/// 重みの下限 (信頼度0でも符号反転・ゼロ除算を起こさない)
pub const MIN_WEIGHT: f64 = 0.01;

/// スケールの下限 (全点が一致する場合)
pub const SCALE_EPSILON: f64 = 1e-6;

/// 平行移動・スケールを除去し、信頼度で重み付けした姿勢ベクトル
///
/// `coords` は `[x0, y0, x1, y1, ...]` の 2N 要素。
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPose {
    coords: Vec<f32>,
}

impl NormalizedPose {
    pub fn as_slice(&self) -> &[f32] {
        &self.coords
    }

    /// キーポイント数 (N)
    pub fn len(&self) -> usize {
        self.coords.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// (x, y) の組を順に返す
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.coords
            .chunks_exact(2)
            .map(|p| (p[0] as f64, p[1] as f64))
    }
}

fn weight(kp: &Keypoint) -> f64 {
    (kp.score as f64).max(MIN_WEIGHT)
}

/// キーポイント列を正規化する
///
/// 1. 信頼度で重み付けした重心を引く
/// 2. 重み付き RMS 半径で割る
/// 3. 各点に sqrt(重み) を掛ける
///
/// 空の入力は None。
pub fn normalize(keypoints: &[Keypoint]) -> Option<NormalizedPose> {
    if keypoints.is_empty() {
        return None;
    }

    let mut weight_sum = 0.0;
    let mut x_sum = 0.0;
    let mut y_sum = 0.0;
    for kp in keypoints {
        let w = weight(kp);
        weight_sum += w;
        x_sum += kp.x as f64 * w;
        y_sum += kp.y as f64 * w;
    }
    let x_center = x_sum / weight_sum;
    let y_center = y_sum / weight_sum;

    let mut variance = 0.0;
    let mut centered = Vec::with_capacity(keypoints.len());
    for kp in keypoints {
        let w = weight(kp);
        let cx = kp.x as f64 - x_center;
        let cy = kp.y as f64 - y_center;
        variance += w * (cx * cx + cy * cy);
        centered.push((cx, cy, w));
    }

    let scale = (variance / weight_sum).sqrt().max(SCALE_EPSILON);

    let mut coords = Vec::with_capacity(keypoints.len() * 2);
    for (cx, cy, w) in centered {
        let factor = w.sqrt();
        coords.push((cx / scale * factor) as f32);
        coords.push((cy / scale * factor) as f32);
    }

    Some(NormalizedPose { coords })
}
