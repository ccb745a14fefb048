//! Pure per-frame evaluation of an exercise session.
//!
//! `evaluate` never mutates its input and never touches timers; any delayed
//! work is returned as an [`Effect`] for the controller to schedule.

use std::time::Duration;

use crate::error::FrameRejection;
use crate::models::{Joint, Landmark, LandmarkFrame};

use super::gestures::{
    arm_extension_pct, check_frame, elbows_at_shoulder_height, hands_above_nose,
    required_joints, wrist_openness_pct, GestureThresholds,
};
use super::state::{ExercisePhase, ExerciseSession, Trigger};

/// Pause between the last rep and the next phase, so completion can be shown.
pub const PHASE_ADVANCE_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Fire `Trigger::TargetRepsReached` after `after`, if still in `from`.
    ScheduleAdvance { from: ExercisePhase, after: Duration },
}

#[derive(Debug, Clone)]
pub struct Evaluation {
    pub session: ExerciseSession,
    /// Set when the frame was ignored; `session` is then identical to the input.
    pub rejection: Option<FrameRejection>,
    /// Phase entered synchronously by this frame.
    pub entered: Option<ExercisePhase>,
    pub effect: Option<Effect>,
}

impl Evaluation {
    fn unchanged(session: &ExerciseSession) -> Self {
        Self {
            session: session.clone(),
            rejection: None,
            entered: None,
            effect: None,
        }
    }
}

/// Per-exercise wording for the rep loop.
struct RepCopy {
    holding: &'static str,
    counted: &'static str,
    finished: &'static str,
}

const SKY_REACHES_COPY: RepCopy = RepCopy {
    holding: "Excellent reach! Hold it...",
    counted: "Relax down.",
    finished: "Great job!",
};

const CHEST_OPENERS_COPY: RepCopy = RepCopy {
    holding: "Feel the stretch...",
    counted: "Relax.",
    finished: "All done!",
};

pub fn evaluate(
    session: &ExerciseSession,
    frame: &LandmarkFrame,
    thresholds: &GestureThresholds,
) -> Evaluation {
    if !session.phase.is_gesture_driven() {
        return Evaluation::unchanged(session);
    }

    if let Err(rejection) = check_frame(frame, required_joints(session.phase), thresholds.min_visibility) {
        let mut evaluation = Evaluation::unchanged(session);
        evaluation.rejection = Some(rejection);
        return evaluation;
    }

    // Presence was verified above
    let joint = |j: Joint| frame.get(j).unwrap_or(Landmark::new(0.0, 0.0));

    let mut next = session.clone();
    let mut entered = None;
    let mut effect = None;

    match session.phase {
        ExercisePhase::Initializing => {
            let up = hands_above_nose(
                joint(Joint::Nose),
                joint(Joint::LeftWrist),
                joint(Joint::RightWrist),
            );
            if up {
                next.hold_counter += 1;
                if next.hold_counter >= thresholds.calibration_hold_frames {
                    entered = next.apply(Trigger::CalibrationHeld);
                } else {
                    next.feedback_text = format!(
                        "Perfect! Hold... {}/{}",
                        next.hold_counter, thresholds.calibration_hold_frames
                    );
                }
            } else {
                next.hold_counter = 0;
                next.feedback_text = "Raise both hands above your nose!".to_string();
            }
        }
        ExercisePhase::SkyReaches => {
            let pct = arm_extension_pct(
                joint(Joint::LeftShoulder),
                joint(Joint::RightShoulder),
                joint(Joint::LeftWrist),
                joint(Joint::RightWrist),
                thresholds.extension_scale,
            );
            let satisfied = pct > thresholds.extension_threshold_pct;
            let guidance = format!(
                "Reach higher! ({pct}% of {}%)",
                thresholds.extension_threshold_pct
            );
            effect = step_reps(&mut next, pct, satisfied, guidance, &SKY_REACHES_COPY, thresholds);
        }
        ExercisePhase::ChestOpeners => {
            let level = elbows_at_shoulder_height(
                joint(Joint::LeftShoulder),
                joint(Joint::RightShoulder),
                joint(Joint::LeftElbow),
                joint(Joint::RightElbow),
                thresholds.elbow_level_tolerance,
            );
            let pct = wrist_openness_pct(
                joint(Joint::LeftWrist),
                joint(Joint::RightWrist),
                thresholds.openness_scale,
            );
            let satisfied = level && pct > thresholds.openness_threshold_pct;
            let guidance = if level {
                format!("Open wider! ({pct}% of {}%)", thresholds.openness_threshold_pct)
            } else {
                format!("Elbows up to shoulder height! ({pct}% open)")
            };
            effect = step_reps(&mut next, pct, satisfied, guidance, &CHEST_OPENERS_COPY, thresholds);
        }
        ExercisePhase::Breathing | ExercisePhase::Completed => {}
    }

    Evaluation {
        session: next,
        rejection: None,
        entered,
        effect,
    }
}

/// Shared hold-and-count loop of both arm exercises.
fn step_reps(
    session: &mut ExerciseSession,
    pct: u8,
    satisfied: bool,
    guidance: String,
    copy: &RepCopy,
    thresholds: &GestureThresholds,
) -> Option<Effect> {
    session.last_metric_pct = Some(pct);

    if session.advance_pending {
        session.hold_counter = 0;
        session.feedback_text = copy.finished.to_string();
        return None;
    }

    if !satisfied {
        session.hold_counter = 0;
        session.feedback_text = guidance;
        return None;
    }

    session.hold_counter += 1;
    session.feedback_text = copy.holding.to_string();
    if session.hold_counter < thresholds.rep_hold_frames {
        return None;
    }

    session.reps_completed += 1;
    session.score += thresholds.rep_score;
    session.hold_counter = 0;
    session.feedback_text = copy.counted.to_string();

    if session.reps_completed >= thresholds.target_reps {
        session.advance_pending = true;
        session.feedback_text = copy.finished.to_string();
        return Some(Effect::ScheduleAdvance {
            from: session.phase,
            after: PHASE_ADVANCE_DELAY,
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coach::gestures::{REP_HOLD_FRAMES, REP_SCORE, TARGET_REPS};
    use chrono::Utc;

    fn lm(x: f32, y: f32) -> Landmark {
        Landmark::new(x, y)
    }

    fn hands_up() -> LandmarkFrame {
        LandmarkFrame::new()
            .with(Joint::Nose, lm(0.5, 0.35))
            .with(Joint::LeftWrist, lm(0.35, 0.1))
            .with(Joint::RightWrist, lm(0.65, 0.1))
    }

    fn full_reach() -> LandmarkFrame {
        LandmarkFrame::new()
            .with(Joint::LeftShoulder, lm(0.4, 0.5))
            .with(Joint::RightShoulder, lm(0.6, 0.5))
            .with(Joint::LeftWrist, lm(0.4, 0.05))
            .with(Joint::RightWrist, lm(0.6, 0.05))
    }

    fn half_reach() -> LandmarkFrame {
        full_reach()
            .with(Joint::LeftWrist, lm(0.4, 0.3))
            .with(Joint::RightWrist, lm(0.6, 0.3))
    }

    fn open_chest() -> LandmarkFrame {
        LandmarkFrame::new()
            .with(Joint::LeftShoulder, lm(0.4, 0.5))
            .with(Joint::RightShoulder, lm(0.6, 0.5))
            .with(Joint::LeftElbow, lm(0.25, 0.52))
            .with(Joint::RightElbow, lm(0.75, 0.48))
            .with(Joint::LeftWrist, lm(0.15, 0.3))
            .with(Joint::RightWrist, lm(0.85, 0.3))
    }

    fn session_in(phase: ExercisePhase) -> ExerciseSession {
        let mut session = ExerciseSession::new("s".into(), Utc::now());
        session.phase = phase;
        session
    }

    fn feed(session: &mut ExerciseSession, frame: &LandmarkFrame, n: u32) -> Vec<Effect> {
        let thresholds = GestureThresholds::default();
        let mut effects = Vec::new();
        for _ in 0..n {
            let evaluation = evaluate(session, frame, &thresholds);
            *session = evaluation.session;
            effects.extend(evaluation.effect);
        }
        effects
    }

    #[test]
    fn calibration_needs_continuous_hold() {
        let mut session = session_in(ExercisePhase::Initializing);
        feed(&mut session, &hands_up(), 9);
        assert_eq!(session.phase, ExercisePhase::Initializing);
        assert_eq!(session.hold_counter, 9);

        let hands_down = hands_up().with(Joint::LeftWrist, lm(0.35, 0.6));
        feed(&mut session, &hands_down, 1);
        assert_eq!(session.hold_counter, 0);

        feed(&mut session, &hands_up(), 9);
        assert_eq!(session.phase, ExercisePhase::Initializing);

        let evaluation = evaluate(&session, &hands_up(), &GestureThresholds::default());
        assert_eq!(evaluation.entered, Some(ExercisePhase::SkyReaches));
        assert_eq!(evaluation.session.reps_completed, 0);
        assert_eq!(evaluation.session.hold_counter, 0);
    }

    #[test]
    fn rejected_frame_changes_nothing() {
        let session = session_in(ExercisePhase::SkyReaches);
        let partial = full_reach().with(Joint::RightShoulder, Landmark::with_visibility(0.6, 0.5, 0.1));
        let evaluation = evaluate(&session, &partial, &GestureThresholds::default());
        assert!(evaluation.rejection.is_some());
        assert_eq!(evaluation.session, session);
    }

    #[test]
    fn nan_visibility_does_not_advance_calibration() {
        let session = session_in(ExercisePhase::Initializing);
        let unsure = hands_up().with(Joint::RightWrist, Landmark::with_visibility(0.65, 0.1, f32::NAN));
        let evaluation = evaluate(&session, &unsure, &GestureThresholds::default());
        assert!(evaluation.rejection.is_some());
        assert_eq!(evaluation.session.hold_counter, 0);
    }

    #[test]
    fn rep_counts_after_hold_and_scores() {
        let mut session = session_in(ExercisePhase::SkyReaches);
        feed(&mut session, &full_reach(), REP_HOLD_FRAMES - 1);
        assert_eq!(session.reps_completed, 0);
        feed(&mut session, &full_reach(), 1);
        assert_eq!(session.reps_completed, 1);
        assert_eq!(session.score, REP_SCORE);
        assert_eq!(session.hold_counter, 0);
    }

    #[test]
    fn interrupted_hold_does_not_count() {
        let mut session = session_in(ExercisePhase::SkyReaches);
        feed(&mut session, &full_reach(), 30);
        feed(&mut session, &half_reach(), 1);
        assert_eq!(session.hold_counter, 0);
        assert_eq!(session.last_metric_pct, Some(50));
        assert!(session.feedback_text.contains("50%"));
        feed(&mut session, &full_reach(), 30);
        assert_eq!(session.reps_completed, 0);
    }

    #[test]
    fn target_reps_schedule_one_advance() {
        let mut session = session_in(ExercisePhase::SkyReaches);
        let effects = feed(&mut session, &full_reach(), REP_HOLD_FRAMES * TARGET_REPS);
        assert_eq!(
            effects,
            vec![Effect::ScheduleAdvance {
                from: ExercisePhase::SkyReaches,
                after: PHASE_ADVANCE_DELAY
            }]
        );
        assert!(session.advance_pending);
        assert_eq!(session.phase, ExercisePhase::SkyReaches);

        // Extra frames while waiting neither count nor reschedule
        let effects = feed(&mut session, &full_reach(), REP_HOLD_FRAMES * 2);
        assert!(effects.is_empty());
        assert_eq!(session.reps_completed, TARGET_REPS);
        assert_eq!(session.score, REP_SCORE * TARGET_REPS);
    }

    #[test]
    fn chest_openers_need_level_elbows() {
        let mut session = session_in(ExercisePhase::ChestOpeners);
        let dropped = open_chest().with(Joint::LeftElbow, lm(0.25, 0.8));
        feed(&mut session, &dropped, REP_HOLD_FRAMES * 2);
        assert_eq!(session.reps_completed, 0);
        assert!(session.feedback_text.starts_with("Elbows up"));

        feed(&mut session, &open_chest(), REP_HOLD_FRAMES);
        assert_eq!(session.reps_completed, 1);
    }

    #[test]
    fn timed_phases_ignore_frames() {
        for phase in [ExercisePhase::Breathing, ExercisePhase::Completed] {
            let session = session_in(phase);
            let evaluation = evaluate(&session, &LandmarkFrame::new(), &GestureThresholds::default());
            assert_eq!(evaluation.session, session);
            assert!(evaluation.rejection.is_none());
        }
    }
}
