use serde::{Deserialize, Serialize};

use crate::models::Joint;

/// Why a landmark frame was ignored. Frames are skipped, never fatal.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum FrameRejection {
    #[error("landmark {0:?} missing from frame")]
    MissingJoint(Joint),

    #[error("landmark {joint:?} below visibility threshold ({visibility:.2})")]
    LowVisibility { joint: Joint, visibility: f32 },

    #[error("landmark {0:?} lies outside the normalized image area")]
    InvalidCoordinate(Joint),
}

/// Session-level failure of an upstream collaborator. Distinct from phase state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", content = "detail", rename_all = "camelCase")]
pub enum SessionFault {
    #[error("camera unavailable: {0}")]
    CameraUnavailable(String),

    #[error("pose estimation unavailable: {0}")]
    PoseEstimatorUnavailable(String),
}
