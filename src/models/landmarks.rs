//! Pose landmarks consumed by the breathing coach.
//!
//! The pose estimator reports 33 MediaPipe points per camera frame; the coach
//! only tracks the upper-body subset below. Coordinates are normalized to the
//! frame, with y increasing downward.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

// MediaPipe Pose indices for the tracked joints
pub const NOSE: usize = 0;
pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_ELBOW: usize = 13;
pub const RIGHT_ELBOW: usize = 14;
pub const LEFT_WRIST: usize = 15;
pub const RIGHT_WRIST: usize = 16;

/// Number of points in a full MediaPipe Pose result.
pub const POSE_LANDMARK_COUNT: usize = 33;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Joint {
    Nose,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
}

impl Joint {
    pub const COUNT: usize = 7;

    pub const ALL: [Joint; Joint::COUNT] = [
        Joint::Nose,
        Joint::LeftShoulder,
        Joint::RightShoulder,
        Joint::LeftElbow,
        Joint::RightElbow,
        Joint::LeftWrist,
        Joint::RightWrist,
    ];

    fn slot(self) -> usize {
        match self {
            Joint::Nose => 0,
            Joint::LeftShoulder => 1,
            Joint::RightShoulder => 2,
            Joint::LeftElbow => 3,
            Joint::RightElbow => 4,
            Joint::LeftWrist => 5,
            Joint::RightWrist => 6,
        }
    }

    /// Index of this joint in a MediaPipe Pose landmark list.
    pub fn pose_index(self) -> usize {
        match self {
            Joint::Nose => NOSE,
            Joint::LeftShoulder => LEFT_SHOULDER,
            Joint::RightShoulder => RIGHT_SHOULDER,
            Joint::LeftElbow => LEFT_ELBOW,
            Joint::RightElbow => RIGHT_ELBOW,
            Joint::LeftWrist => LEFT_WRIST,
            Joint::RightWrist => RIGHT_WRIST,
        }
    }
}

/// A single 2D landmark in normalized frame coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Landmark {
    pub x: f32, // 0-1 normalized
    pub y: f32, // 0-1 normalized, grows downward
    /// Detector confidence; `None` when the estimator does not report one.
    pub visibility: Option<f32>,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            visibility: None,
        }
    }

    pub fn with_visibility(x: f32, y: f32, visibility: f32) -> Self {
        Self {
            x,
            y,
            visibility: Some(visibility),
        }
    }
}

/// The tracked joints of one camera frame. Never retained past evaluation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandmarkFrame {
    joints: [Option<Landmark>; Joint::COUNT],
}

impl LandmarkFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for hosts assembling frames by hand.
    pub fn with(mut self, joint: Joint, landmark: Landmark) -> Self {
        self.set(joint, landmark);
        self
    }

    pub fn set(&mut self, joint: Joint, landmark: Landmark) {
        self.joints[joint.slot()] = Some(landmark);
    }

    pub fn get(&self, joint: Joint) -> Option<Landmark> {
        self.joints[joint.slot()]
    }

    pub fn is_empty(&self) -> bool {
        self.joints.iter().all(Option::is_none)
    }

    /// Decode a full pose result given as `[x, y, z, visibility]` rows.
    ///
    /// Depth is dropped; the coach works in the image plane only.
    pub fn from_pose_landmarks(points: &[[f32; 4]]) -> Result<Self> {
        if points.len() != POSE_LANDMARK_COUNT {
            bail!(
                "invalid pose landmark count: {} (expected {})",
                points.len(),
                POSE_LANDMARK_COUNT
            );
        }

        let mut frame = Self::new();
        for joint in Joint::ALL {
            let [x, y, _z, visibility] = points[joint.pose_index()];
            frame.set(joint, Landmark::with_visibility(x, y, visibility));
        }
        Ok(frame)
    }
}
