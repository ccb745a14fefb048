//! Per-phase pose metrics for the coach.
//!
//! All inputs are normalized image coordinates with y growing downward, so
//! "above" means a smaller y.

use crate::error::FrameRejection;
use crate::models::{Joint, Landmark, LandmarkFrame};

use super::state::ExercisePhase;

pub const TARGET_REPS: u32 = 3;
pub const REP_SCORE: u32 = 15;
pub const CALIBRATION_HOLD_FRAMES: u32 = 10;
/// Roughly 1.3 s at 30 fps. Counted in frames, not wall-clock.
pub const REP_HOLD_FRAMES: u32 = 40;

/// Tunable gesture constants. Defaults are the shipped design values.
#[derive(Debug, Clone)]
pub struct GestureThresholds {
    pub calibration_hold_frames: u32,
    pub rep_hold_frames: u32,
    pub target_reps: u32,
    pub rep_score: u32,
    /// Extension percentage that must be exceeded during Sky Reaches.
    pub extension_threshold_pct: u8,
    /// Maps mean shoulder-to-wrist rise to a percentage; full overhead reach is ~100%.
    pub extension_scale: f32,
    /// Openness percentage that must be exceeded during Chest Openers.
    pub openness_threshold_pct: u8,
    pub openness_scale: f32,
    /// Max vertical distance between elbow and shoulder to count as level.
    pub elbow_level_tolerance: f32,
    pub min_visibility: f32,
}

impl Default for GestureThresholds {
    fn default() -> Self {
        Self {
            calibration_hold_frames: CALIBRATION_HOLD_FRAMES,
            rep_hold_frames: REP_HOLD_FRAMES,
            target_reps: TARGET_REPS,
            rep_score: REP_SCORE,
            extension_threshold_pct: 80,
            extension_scale: 250.0,
            openness_threshold_pct: 60,
            openness_scale: 150.0,
            elbow_level_tolerance: 0.15,
            min_visibility: 0.5,
        }
    }
}

/// Joints a frame must carry for the given phase to evaluate it.
pub fn required_joints(phase: ExercisePhase) -> &'static [Joint] {
    match phase {
        ExercisePhase::Initializing => &[Joint::Nose, Joint::LeftWrist, Joint::RightWrist],
        ExercisePhase::SkyReaches => &[
            Joint::LeftShoulder,
            Joint::RightShoulder,
            Joint::LeftWrist,
            Joint::RightWrist,
        ],
        ExercisePhase::ChestOpeners => &[
            Joint::LeftShoulder,
            Joint::RightShoulder,
            Joint::LeftElbow,
            Joint::RightElbow,
            Joint::LeftWrist,
            Joint::RightWrist,
        ],
        ExercisePhase::Breathing | ExercisePhase::Completed => &[],
    }
}

/// Verify every required joint is present, inside the image and visible enough.
pub fn check_frame(
    frame: &LandmarkFrame,
    required: &[Joint],
    min_visibility: f32,
) -> Result<(), FrameRejection> {
    for &joint in required {
        let landmark = frame.get(joint).ok_or(FrameRejection::MissingJoint(joint))?;
        // Normalized image coordinates; NaN fails the range check.
        if !(0.0..=1.0).contains(&landmark.x) || !(0.0..=1.0).contains(&landmark.y) {
            return Err(FrameRejection::InvalidCoordinate(joint));
        }
        if let Some(visibility) = landmark.visibility {
            if visibility.is_nan() || visibility < min_visibility {
                return Err(FrameRejection::LowVisibility { joint, visibility });
            }
        }
    }
    Ok(())
}

/// Both wrists strictly above the nose.
pub fn hands_above_nose(nose: Landmark, left_wrist: Landmark, right_wrist: Landmark) -> bool {
    left_wrist.y < nose.y && right_wrist.y < nose.y
}

/// Mean vertical rise of the wrists over the shoulders, as a 0-100 percentage.
pub fn arm_extension_pct(
    left_shoulder: Landmark,
    right_shoulder: Landmark,
    left_wrist: Landmark,
    right_wrist: Landmark,
    scale: f32,
) -> u8 {
    let left = (left_shoulder.y - left_wrist.y).max(0.0);
    let right = (right_shoulder.y - right_wrist.y).max(0.0);
    to_pct((left + right) / 2.0 * scale)
}

/// Both elbows within `tolerance` of their shoulder's height.
pub fn elbows_at_shoulder_height(
    left_shoulder: Landmark,
    right_shoulder: Landmark,
    left_elbow: Landmark,
    right_elbow: Landmark,
    tolerance: f32,
) -> bool {
    (left_elbow.y - left_shoulder.y).abs() < tolerance
        && (right_elbow.y - right_shoulder.y).abs() < tolerance
}

/// Horizontal wrist separation as a 0-100 percentage.
pub fn wrist_openness_pct(left_wrist: Landmark, right_wrist: Landmark, scale: f32) -> u8 {
    to_pct((left_wrist.x - right_wrist.x).abs() * scale)
}

fn to_pct(value: f32) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lm(x: f32, y: f32) -> Landmark {
        Landmark::new(x, y)
    }

    #[test]
    fn hands_must_be_strictly_above_nose() {
        let nose = lm(0.5, 0.3);
        assert!(hands_above_nose(nose, lm(0.4, 0.1), lm(0.6, 0.2)));
        assert!(!hands_above_nose(nose, lm(0.4, 0.3), lm(0.6, 0.2)));
        assert!(!hands_above_nose(nose, lm(0.4, 0.1), lm(0.6, 0.5)));
    }

    #[test]
    fn extension_is_floored_and_capped() {
        let shoulder = lm(0.0, 0.5);
        // Wrists below shoulders contribute nothing
        assert_eq!(arm_extension_pct(shoulder, shoulder, lm(0.0, 0.7), lm(0.0, 0.9), 250.0), 0);
        // 0.2 rise * 250 = 50%
        assert_eq!(arm_extension_pct(shoulder, shoulder, lm(0.0, 0.3), lm(0.0, 0.3), 250.0), 50);
        // Full overhead reach saturates at 100%
        assert_eq!(arm_extension_pct(shoulder, shoulder, lm(0.0, 0.0), lm(0.0, 0.0), 250.0), 100);
    }

    #[test]
    fn one_lowered_arm_halves_extension() {
        let shoulder = lm(0.0, 0.6);
        let pct = arm_extension_pct(shoulder, shoulder, lm(0.0, 0.2), lm(0.0, 0.8), 250.0);
        assert_eq!(pct, 50);
    }

    #[test]
    fn elbow_level_uses_tolerance_on_both_sides() {
        let ls = lm(0.4, 0.5);
        let rs = lm(0.6, 0.5);
        assert!(elbows_at_shoulder_height(ls, rs, lm(0.3, 0.55), lm(0.7, 0.45), 0.15));
        assert!(!elbows_at_shoulder_height(ls, rs, lm(0.3, 0.7), lm(0.7, 0.45), 0.15));
    }

    #[test]
    fn openness_scales_horizontal_separation() {
        assert_eq!(wrist_openness_pct(lm(0.2, 0.5), lm(0.8, 0.5), 150.0), 90);
        assert_eq!(wrist_openness_pct(lm(0.8, 0.5), lm(0.2, 0.5), 150.0), 90);
        assert_eq!(wrist_openness_pct(lm(0.0, 0.5), lm(1.0, 0.5), 150.0), 100);
    }

    #[test]
    fn check_frame_reports_first_problem() {
        let frame = LandmarkFrame::new()
            .with(Joint::Nose, lm(0.5, 0.3))
            .with(Joint::LeftWrist, Landmark::with_visibility(0.4, 0.1, 0.2));

        let required = required_joints(ExercisePhase::Initializing);
        assert!(matches!(
            check_frame(&frame, required, 0.5),
            Err(FrameRejection::LowVisibility { joint: Joint::LeftWrist, .. })
        ));

        let frame = frame.with(Joint::LeftWrist, lm(0.4, 0.1));
        assert_eq!(
            check_frame(&frame, required, 0.5),
            Err(FrameRejection::MissingJoint(Joint::RightWrist))
        );

        let frame = frame.with(Joint::RightWrist, lm(f32::NAN, 0.1));
        assert_eq!(
            check_frame(&frame, required, 0.5),
            Err(FrameRejection::InvalidCoordinate(Joint::RightWrist))
        );

        let frame = frame.with(Joint::RightWrist, lm(0.6, -0.05));
        assert_eq!(
            check_frame(&frame, required, 0.5),
            Err(FrameRejection::InvalidCoordinate(Joint::RightWrist))
        );

        let frame = frame.with(Joint::RightWrist, lm(1.0, 0.0));
        assert!(check_frame(&frame, required, 0.5).is_ok());
    }

    #[test]
    fn nan_visibility_is_not_visible() {
        let frame = LandmarkFrame::new()
            .with(Joint::Nose, lm(0.5, 0.3))
            .with(Joint::LeftWrist, Landmark::with_visibility(0.4, 0.1, f32::NAN))
            .with(Joint::RightWrist, lm(0.6, 0.1));
        assert!(matches!(
            check_frame(&frame, required_joints(ExercisePhase::Initializing), 0.5),
            Err(FrameRejection::LowVisibility { joint: Joint::LeftWrist, .. })
        ));
    }

    #[test]
    fn timed_phases_need_no_joints() {
        assert!(required_joints(ExercisePhase::Breathing).is_empty());
        assert!(check_frame(&LandmarkFrame::new(), required_joints(ExercisePhase::Completed), 0.5).is_ok());
    }
}
