use anyhow::Result;
use rand::Rng;

use crate::config::{ChallengeConfig, Config, ScoringConfig};
use crate::pose::{Pose, PoseName};
use crate::scoring::{similarity, MatchScore};

/// チャレンジ終了時の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChallengeResult {
    pub pose: PoseName,
    /// 計測中の最大 distance (0〜100)
    pub peak: u8,
    pub won: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeState {
    Idle,
    Running { remaining: u32 },
    Finished(ChallengeResult),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeEvent {
    Tick { remaining: u32 },
    /// 残り時間警告 (1回のみ)
    Warning { remaining: u32 },
    Finished(ChallengeResult),
}

/// 制限時間付きのポーズ再現チャレンジ
///
/// 呼び出し側が 1 秒ごとに `tick()`、検出フレームごとに `observe()` を呼ぶ。
/// タイマーやスレッドは持たない。
pub struct ChallengeSession {
    challenge: ChallengeConfig,
    scoring: ScoringConfig,
    target: PoseName,
    state: ChallengeState,
    peak: u8,
    warned: bool,
    frames_scored: usize,
}

impl ChallengeSession {
    pub fn new(challenge: &ChallengeConfig, scoring: &ScoringConfig, target: PoseName) -> Self {
        Self {
            challenge: challenge.clone(),
            scoring: scoring.clone(),
            target,
            state: ChallengeState::Idle,
            peak: 0,
            warned: false,
            frames_scored: 0,
        }
    }

    /// 設定から作成 (`challenge.default_pose` が不正ならエラー)
    pub fn from_config(config: &Config) -> Result<Self> {
        let target: PoseName = config.challenge.default_pose.parse()?;
        Ok(Self::new(&config.challenge, &config.scoring, target))
    }

    pub fn target(&self) -> PoseName {
        self.target
    }

    pub fn state(&self) -> ChallengeState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, ChallengeState::Running { .. })
    }

    pub fn peak(&self) -> u8 {
        self.peak
    }

    pub fn frames_scored(&self) -> usize {
        self.frames_scored
    }

    /// お手本を切り替える (タイマーには触れない)
    pub fn select_pose(&mut self, pose: PoseName) {
        tracing::debug!(pose = pose.key(), "target pose selected");
        self.target = pose;
    }

    /// タイマーを開始 (実行中ならリスタート)
    pub fn start(&mut self) {
        self.peak = 0;
        self.warned = false;
        self.frames_scored = 0;
        self.state = ChallengeState::Running {
            remaining: self.challenge.duration_secs,
        };
        tracing::info!(
            pose = self.target.key(),
            duration = self.challenge.duration_secs,
            "challenge started"
        );
    }

    /// 現在と違うポーズをランダムに選んで開始
    pub fn start_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> PoseName {
        let pose = PoseName::random_other(self.target, rng);
        self.select_pose(pose);
        self.start();
        pose
    }

    /// 結果を残さずに中断
    pub fn stop(&mut self) {
        if self.is_running() {
            tracing::info!("challenge stopped");
        }
        self.state = ChallengeState::Idle;
    }

    /// 1 秒経過
    pub fn tick(&mut self) -> Vec<ChallengeEvent> {
        let ChallengeState::Running { remaining } = self.state else {
            return Vec::new();
        };

        let remaining = remaining.saturating_sub(1);
        let mut events = vec![ChallengeEvent::Tick { remaining }];

        if remaining == self.challenge.warning_at_secs && !self.warned {
            self.warned = true;
            tracing::info!(remaining, "time warning");
            events.push(ChallengeEvent::Warning { remaining });
        }

        if remaining == 0 {
            let result = ChallengeResult {
                pose: self.target,
                peak: self.peak,
                won: self.peak < self.challenge.win_threshold,
            };
            tracing::info!(
                pose = result.pose.key(),
                peak = result.peak,
                won = result.won,
                frames = self.frames_scored,
                "challenge finished"
            );
            self.state = ChallengeState::Finished(result);
            events.push(ChallengeEvent::Finished(result));
        } else {
            self.state = ChallengeState::Running { remaining };
        }

        events
    }

    /// 検出結果を採点する
    ///
    /// 実行中かつ信頼できるキーポイントが十分ある場合のみ採点し、
    /// distance の最大値を更新する。
    pub fn observe(&mut self, pose: Option<&Pose>) -> Option<MatchScore> {
        if !self.is_running() {
            return None;
        }
        let pose = pose?;

        let confident = pose.confident_count(self.scoring.confidence_threshold);
        if confident <= self.scoring.min_confident_points {
            tracing::trace!(confident, "not enough confident keypoints");
            return None;
        }

        let score = MatchScore::from_similarity(similarity(
            pose.as_slice(),
            self.target.pose().as_slice(),
        ));
        self.peak = self.peak.max(score.distance);
        self.frames_scored += 1;
        tracing::debug!(
            similarity = score.similarity,
            distance = score.distance,
            peak = self.peak,
            "frame scored"
        );
        Some(score)
    }
}
