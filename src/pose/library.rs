use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Result};
use rand::seq::SliceRandom;
use rand::Rng;

use super::keypoint::{Keypoint, Pose};

const fn kp(x: f32, y: f32) -> Keypoint {
    Keypoint::new(x, y, 1.0)
}

/// お手本ポーズ (全キーポイント信頼度 1.0)
static T_POSE: Pose = Pose::new([
    kp(0.5, 0.08),
    kp(0.47, 0.07),
    kp(0.53, 0.07),
    kp(0.45, 0.09),
    kp(0.55, 0.09),
    kp(0.38, 0.2),
    kp(0.62, 0.2),
    kp(0.25, 0.35),
    kp(0.75, 0.35),
    kp(0.15, 0.5),
    kp(0.85, 0.5),
    kp(0.42, 0.45),
    kp(0.58, 0.45),
    kp(0.44, 0.7),
    kp(0.56, 0.7),
    kp(0.45, 0.95),
    kp(0.55, 0.95),
]);

static VICTORY_POSE: Pose = Pose::new([
    kp(0.5, 0.05),
    kp(0.46, 0.04),
    kp(0.54, 0.04),
    kp(0.43, 0.06),
    kp(0.57, 0.06),
    kp(0.4, 0.18),
    kp(0.6, 0.18),
    kp(0.3, 0.08),
    kp(0.7, 0.08),
    kp(0.2, 0.08),
    kp(0.8, 0.08),
    kp(0.45, 0.45),
    kp(0.55, 0.45),
    kp(0.43, 0.75),
    kp(0.57, 0.75),
    kp(0.42, 0.98),
    kp(0.58, 0.98),
]);

static WARRIOR_POSE: Pose = Pose::new([
    kp(0.45, 0.08),
    kp(0.42, 0.07),
    kp(0.48, 0.07),
    kp(0.39, 0.09),
    kp(0.51, 0.09),
    kp(0.33, 0.22),
    kp(0.55, 0.22),
    kp(0.2, 0.35),
    kp(0.7, 0.2),
    kp(0.08, 0.45),
    kp(0.85, 0.18),
    kp(0.36, 0.48),
    kp(0.6, 0.48),
    kp(0.3, 0.72),
    kp(0.68, 0.62),
    kp(0.25, 0.98),
    kp(0.8, 0.75),
]);

static ARCHER_POSE: Pose = Pose::new([
    kp(0.45, 0.08),
    kp(0.43, 0.07),
    kp(0.47, 0.07),
    kp(0.4, 0.09),
    kp(0.5, 0.09),
    kp(0.36, 0.22),
    kp(0.56, 0.22),
    // 左腕は弓を前に、右腕は弦を引く
    kp(0.25, 0.25),
    kp(0.7, 0.18),
    kp(0.18, 0.28),
    kp(0.8, 0.16),
    kp(0.4, 0.5),
    kp(0.6, 0.5),
    // 前脚は曲げ、後脚は伸ばす
    kp(0.35, 0.8),
    kp(0.7, 0.65),
    kp(0.32, 0.98),
    kp(0.78, 0.85),
]);

/// ライブラリに登録されたポーズ名
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoseName {
    TPose,
    Victory,
    Warrior,
    Archer,
}

impl PoseName {
    pub const ALL: [PoseName; 4] = [
        PoseName::TPose,
        PoseName::Victory,
        PoseName::Archer,
        PoseName::Warrior,
    ];

    /// 設定ファイル・CLIで使うキー
    pub fn key(self) -> &'static str {
        match self {
            Self::TPose => "tPose",
            Self::Victory => "victory",
            Self::Warrior => "warrior",
            Self::Archer => "archer",
        }
    }

    /// 表示用ラベル
    pub fn label(self) -> &'static str {
        match self {
            Self::TPose => "T Pose",
            Self::Victory => "Victory Pose",
            Self::Warrior => "Warrior Pose",
            Self::Archer => "Archer Pose",
        }
    }

    /// お手本のキーポイント
    pub fn pose(self) -> &'static Pose {
        match self {
            Self::TPose => &T_POSE,
            Self::Victory => &VICTORY_POSE,
            Self::Warrior => &WARRIOR_POSE,
            Self::Archer => &ARCHER_POSE,
        }
    }

    /// 現在のポーズ以外からランダムに選ぶ
    pub fn random_other<R: Rng + ?Sized>(current: PoseName, rng: &mut R) -> PoseName {
        let others: Vec<PoseName> = Self::ALL
            .iter()
            .copied()
            .filter(|p| *p != current)
            .collect();
        let candidates: &[PoseName] = if others.is_empty() { &Self::ALL } else { &others };
        *candidates.choose(rng).unwrap_or(&current)
    }
}

impl fmt::Display for PoseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PoseName {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "tpose" | "t" => Ok(Self::TPose),
            "victory" | "victorypose" => Ok(Self::Victory),
            "warrior" | "warriorpose" => Ok(Self::Warrior),
            "archer" | "archerpose" => Ok(Self::Archer),
            _ => bail!("Unknown pose name: {}", s),
        }
    }
}
