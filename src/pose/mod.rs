pub mod file;
pub mod keypoint;
pub mod library;
pub mod movenet;

pub use file::{load_keypoints, parse_keypoints, save_keypoints};
pub use keypoint::{Keypoint, KeypointIndex, Pose, DEFAULT_SCORE};
pub use library::PoseName;
pub use movenet::pose_from_output;
