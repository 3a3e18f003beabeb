use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub challenge: ChallengeConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// キーポイントを「検出済み」とみなす信頼度 (これを超える)
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,
    /// スコア計算に必要な検出済みキーポイント数 (これを超える)
    #[serde(default = "default_min_confident_points")]
    pub min_confident_points: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeConfig {
    /// 制限時間（秒）
    #[serde(default = "default_duration_secs")]
    pub duration_secs: u32,
    /// 残り時間警告（秒）
    #[serde(default = "default_warning_at_secs")]
    pub warning_at_secs: u32,
    /// 最終スコアがこれ未満なら勝ち
    #[serde(default = "default_win_threshold")]
    pub win_threshold: u8,
    /// 起動時のポーズ (PoseName のキー)
    #[serde(default = "default_pose")]
    pub default_pose: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// trace|debug|info|warn|error|off
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_confidence_threshold() -> f32 { 0.3 }
fn default_min_confident_points() -> usize { 10 }
fn default_duration_secs() -> u32 { 30 }
fn default_warning_at_secs() -> u32 { 10 }
fn default_win_threshold() -> u8 { 15 }
fn default_pose() -> String { "tPose".to_string() }
fn default_log_level() -> String { "info".to_string() }

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: default_confidence_threshold(),
            min_confident_points: default_min_confident_points(),
        }
    }
}

impl Default for ChallengeConfig {
    fn default() -> Self {
        Self {
            duration_secs: default_duration_secs(),
            warning_at_secs: default_warning_at_secs(),
            win_threshold: default_win_threshold(),
            default_pose: default_pose(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Invalid config")?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path.as_ref(), content).context("Failed to write config")?;
        Ok(())
    }
}
