use anyhow::{bail, Result};
use ndarray::ArrayViewD;

use super::keypoint::{Keypoint, KeypointIndex, Pose};

/// MoveNet 出力テンソルの形状 [1, 1, 17, 3]
pub const OUTPUT_SHAPE: [usize; 4] = [1, 1, KeypointIndex::COUNT, 3];

/// MoveNet の出力テンソルから姿勢を復元
///
/// 入力: [1, 1, 17, 3] の f32 テンソル (各行は y, x, score)
/// 出力: Pose (17キーポイント)
pub fn pose_from_output(output: ArrayViewD<f32>) -> Result<Pose> {
    if output.shape() != OUTPUT_SHAPE {
        bail!(
            "Unexpected MoveNet output shape {:?}, expected {:?}",
            output.shape(),
            OUTPUT_SHAPE
        );
    }

    let mut keypoints = [Keypoint::default(); KeypointIndex::COUNT];

    for (i, kp) in keypoints.iter_mut().enumerate() {
        let y = output[[0, 0, i, 0]];
        let x = output[[0, 0, i, 1]];
        let score = output[[0, 0, i, 2]];

        *kp = Keypoint::new(x, y, score);
    }

    Ok(Pose::new(keypoints))
}
