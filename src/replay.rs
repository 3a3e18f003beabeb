//! Offline replay of recorded detector output through a challenge session.
//!
//! One JSON object per line: `{"t": <seconds since start>, "keypoints": [...] | null}`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::challenge::{ChallengeEvent, ChallengeSession};
use crate::pose::{Keypoint, Pose};
use crate::scoring::MatchScore;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedFrame {
    /// Seconds since the challenge started.
    pub t: f64,
    #[serde(default)]
    pub keypoints: Option<Vec<Keypoint>>,
}

impl RecordedFrame {
    /// The detected pose, if the frame carries exactly 17 keypoints.
    pub fn pose(&self) -> Option<Pose> {
        self.keypoints.as_deref().and_then(Pose::from_slice)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReplayEvent {
    Scored { t: f64, score: MatchScore },
    Challenge { t: f64, event: ChallengeEvent },
}

pub fn parse_frames(content: &str) -> Result<Vec<RecordedFrame>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).with_context(|| format!("Bad frame on line {}", i + 1))
        })
        .collect()
}

pub fn load_frames<P: AsRef<Path>>(path: P) -> Result<Vec<RecordedFrame>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read frame log {}", path.display()))?;
    parse_frames(&content)
}

/// Starts the session and feeds it the frames in order, ticking once per
/// elapsed whole second. Ticks continue after the last frame until the
/// session finishes.
pub fn replay(session: &mut ChallengeSession, frames: &[RecordedFrame]) -> Vec<ReplayEvent> {
    let mut events = Vec::new();
    let mut elapsed: u32 = 0;

    session.start();

    for frame in frames {
        while session.is_running() && frame.t >= (elapsed + 1) as f64 {
            elapsed += 1;
            events.extend(session.tick().into_iter().map(|event| ReplayEvent::Challenge {
                t: elapsed as f64,
                event,
            }));
        }
        if !session.is_running() {
            break;
        }

        let pose = frame.pose();
        if pose.is_none() && frame.keypoints.is_some() {
            tracing::warn!(t = frame.t, "frame does not hold 17 keypoints, ignored");
        }
        if let Some(score) = session.observe(pose.as_ref()) {
            events.push(ReplayEvent::Scored { t: frame.t, score });
        }
    }

    while session.is_running() {
        elapsed += 1;
        events.extend(session.tick().into_iter().map(|event| ReplayEvent::Challenge {
            t: elapsed as f64,
            event,
        }));
    }

    events
}
