use serde::{Deserialize, Serialize};

/// MoveNet の 17 キーポイントインデックス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum KeypointIndex {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl KeypointIndex {
    pub const COUNT: usize = 17;

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Nose),
            1 => Some(Self::LeftEye),
            2 => Some(Self::RightEye),
            3 => Some(Self::LeftEar),
            4 => Some(Self::RightEar),
            5 => Some(Self::LeftShoulder),
            6 => Some(Self::RightShoulder),
            7 => Some(Self::LeftElbow),
            8 => Some(Self::RightElbow),
            9 => Some(Self::LeftWrist),
            10 => Some(Self::RightWrist),
            11 => Some(Self::LeftHip),
            12 => Some(Self::RightHip),
            13 => Some(Self::LeftKnee),
            14 => Some(Self::RightKnee),
            15 => Some(Self::LeftAnkle),
            16 => Some(Self::RightAnkle),
            _ => None,
        }
    }

    /// 表示用の名前 (snake_case)
    pub fn name(self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEye => "left_eye",
            Self::RightEye => "right_eye",
            Self::LeftEar => "left_ear",
            Self::RightEar => "right_ear",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
        }
    }
}

/// 入力に信頼度が無い場合の既定値
pub const DEFAULT_SCORE: f32 = 0.5;

fn default_score() -> f32 {
    DEFAULT_SCORE
}

/// 単一キーポイント
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    /// 正規化されたX座標 (0.0〜1.0, クランプしない)
    pub x: f32,
    /// 正規化されたY座標 (0.0〜1.0, クランプしない)
    pub y: f32,
    /// 信頼度スコア (0.0〜1.0)
    #[serde(default = "default_score")]
    pub score: f32,
}

impl Keypoint {
    pub const fn new(x: f32, y: f32, score: f32) -> Self {
        Self { x, y, score }
    }

    /// 信頼度が閾値を超えているか
    pub fn is_confident(&self, threshold: f32) -> bool {
        self.score > threshold
    }
}

impl Default for Keypoint {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            score: 0.0,
        }
    }
}

/// 17キーポイントからなる姿勢
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub keypoints: [Keypoint; KeypointIndex::COUNT],
}

impl Pose {
    pub const fn new(keypoints: [Keypoint; KeypointIndex::COUNT]) -> Self {
        Self { keypoints }
    }

    /// スライスから作成 (長さが17でなければ None)
    pub fn from_slice(keypoints: &[Keypoint]) -> Option<Self> {
        let keypoints: [Keypoint; KeypointIndex::COUNT] = keypoints.try_into().ok()?;
        Some(Self { keypoints })
    }

    /// インデックスでキーポイントを取得
    pub fn get(&self, index: KeypointIndex) -> &Keypoint {
        &self.keypoints[index as usize]
    }

    pub fn as_slice(&self) -> &[Keypoint] {
        &self.keypoints
    }

    /// 全キーポイントの平均信頼度
    pub fn average_confidence(&self) -> f32 {
        let sum: f32 = self.keypoints.iter().map(|k| k.score).sum();
        sum / KeypointIndex::COUNT as f32
    }

    /// 閾値を超える信頼度を持つキーポイント数
    pub fn confident_count(&self, threshold: f32) -> usize {
        self.keypoints
            .iter()
            .filter(|k| k.is_confident(threshold))
            .count()
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            keypoints: [Keypoint::default(); KeypointIndex::COUNT],
        }
    }
}

impl AsRef<[Keypoint]> for Pose {
    fn as_ref(&self) -> &[Keypoint] {
        &self.keypoints
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypoint_index_count() {
        assert_eq!(KeypointIndex::COUNT, 17);
    }

    #[test]
    fn test_keypoint_index_from_index() {
        assert_eq!(KeypointIndex::from_index(0), Some(KeypointIndex::Nose));
        assert_eq!(KeypointIndex::from_index(16), Some(KeypointIndex::RightAnkle));
        assert_eq!(KeypointIndex::from_index(17), None);
    }

    #[test]
    fn test_keypoint_index_roundtrips_repr() {
        for i in 0..KeypointIndex::COUNT {
            let idx = KeypointIndex::from_index(i).unwrap();
            assert_eq!(idx as usize, i);
        }
        assert_eq!(KeypointIndex::LeftWrist.name(), "left_wrist");
    }

    #[test]
    fn test_keypoint_is_confident_strict() {
        let kp = Keypoint::new(0.5, 0.5, 0.3);
        assert!(!kp.is_confident(0.3));
        assert!(kp.is_confident(0.29));
    }

    #[test]
    fn test_keypoint_missing_score_defaults() {
        let kp: Keypoint = serde_json::from_str(r#"{"x": 0.2, "y": 0.4}"#).unwrap();
        assert_eq!(kp, Keypoint::new(0.2, 0.4, DEFAULT_SCORE));
    }

    #[test]
    fn test_pose_get() {
        let mut keypoints = [Keypoint::default(); KeypointIndex::COUNT];
        keypoints[KeypointIndex::Nose as usize] = Keypoint::new(0.5, 0.3, 0.9);

        let pose = Pose::new(keypoints);
        let nose = pose.get(KeypointIndex::Nose);
        assert_eq!(nose.x, 0.5);
        assert_eq!(nose.y, 0.3);
        assert_eq!(nose.score, 0.9);
    }

    #[test]
    fn test_pose_from_slice_requires_17() {
        let points = vec![Keypoint::new(0.1, 0.1, 1.0); 17];
        assert!(Pose::from_slice(&points).is_some());
        assert!(Pose::from_slice(&points[..10]).is_none());
        assert!(Pose::from_slice(&[]).is_none());
    }

    #[test]
    fn test_pose_average_confidence() {
        let keypoints = [Keypoint::new(0.0, 0.0, 0.5); KeypointIndex::COUNT];
        let pose = Pose::new(keypoints);
        assert!((pose.average_confidence() - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_pose_confident_count() {
        let mut keypoints = [Keypoint::new(0.0, 0.0, 0.9); KeypointIndex::COUNT];
        for kp in keypoints.iter_mut().take(5) {
            kp.score = 0.2;
        }
        let pose = Pose::new(keypoints);
        assert_eq!(pose.confident_count(0.3), 12);
    }
}
