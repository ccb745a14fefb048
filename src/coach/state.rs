use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExercisePhase {
    Initializing,
    #[serde(rename = "exercise_1")]
    SkyReaches,
    #[serde(rename = "exercise_2")]
    ChestOpeners,
    Breathing,
    Completed,
}

impl Default for ExercisePhase {
    fn default() -> Self {
        ExercisePhase::Initializing
    }
}

impl ExercisePhase {
    pub const ALL: [ExercisePhase; 5] = [
        ExercisePhase::Initializing,
        ExercisePhase::SkyReaches,
        ExercisePhase::ChestOpeners,
        ExercisePhase::Breathing,
        ExercisePhase::Completed,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ExercisePhase::Initializing => "Start Session",
            ExercisePhase::SkyReaches => "Sky Reaches",
            ExercisePhase::ChestOpeners => "Chest Openers",
            ExercisePhase::Breathing => "4-7-8 Breathing",
            ExercisePhase::Completed => "Session Complete",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ExercisePhase::Completed)
    }

    /// Phases whose progress is driven by landmark frames rather than timers.
    pub fn is_gesture_driven(&self) -> bool {
        matches!(
            self,
            ExercisePhase::Initializing | ExercisePhase::SkyReaches | ExercisePhase::ChestOpeners
        )
    }

    fn intro_feedback(&self) -> &'static str {
        match self {
            ExercisePhase::Initializing => "Align yourself in frame...",
            ExercisePhase::SkyReaches => "Reach both arms straight overhead.",
            ExercisePhase::ChestOpeners => "Lift elbows to shoulder height and open your arms.",
            ExercisePhase::Breathing => "Get comfortable for deep breathing...",
            ExercisePhase::Completed => "Session complete. Well done!",
        }
    }
}

/// Sub-phase of the timed 4-7-8 breathing script.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum BreathingStep {
    Ready,
    Inhale,
    Hold,
    Exhale,
}

impl Default for BreathingStep {
    fn default() -> Self {
        BreathingStep::Ready
    }
}

/// Events that can move a session to another phase.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Trigger {
    CalibrationHeld,
    SkipCalibration,
    TargetRepsReached,
    BreathingFinished,
}

impl Trigger {
    pub const ALL: [Trigger; 4] = [
        Trigger::CalibrationHeld,
        Trigger::SkipCalibration,
        Trigger::TargetRepsReached,
        Trigger::BreathingFinished,
    ];
}

/// The phase transition table. Anything not listed is rejected.
pub fn next_phase(phase: ExercisePhase, trigger: Trigger) -> Option<ExercisePhase> {
    use ExercisePhase::*;

    match (phase, trigger) {
        (Initializing, Trigger::CalibrationHeld | Trigger::SkipCalibration) => Some(SkyReaches),
        (SkyReaches, Trigger::TargetRepsReached) => Some(ChestOpeners),
        (ChestOpeners, Trigger::TargetRepsReached) => Some(Breathing),
        (Breathing, Trigger::BreathingFinished) => Some(Completed),
        _ => None,
    }
}

/// Guided sessions walk the full routine; breathing-only sessions loop the
/// 4-7-8 cycle without a camera until closed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum SessionMode {
    #[default]
    Guided,
    BreathingOnly,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseSession {
    pub id: String,
    #[serde(default)]
    pub mode: SessionMode,
    pub phase: ExercisePhase,
    /// Consecutive frames satisfying the current phase condition.
    pub hold_counter: u32,
    pub reps_completed: u32,
    pub score: u32,
    pub breathing_cycle_index: u32,
    pub breathing_step: BreathingStep,
    pub feedback_text: String,
    /// Last computed phase metric, as a 0-100 percentage.
    pub last_metric_pct: Option<u8>,
    /// Target reps reached; the delayed phase advance is scheduled.
    pub advance_pending: bool,
    pub started_at: DateTime<Utc>,
}

impl ExerciseSession {
    pub fn new(id: String, started_at: DateTime<Utc>) -> Self {
        Self {
            id,
            mode: SessionMode::Guided,
            phase: ExercisePhase::Initializing,
            hold_counter: 0,
            reps_completed: 0,
            score: 0,
            breathing_cycle_index: 0,
            breathing_step: BreathingStep::Ready,
            feedback_text: ExercisePhase::Initializing.intro_feedback().to_string(),
            last_metric_pct: None,
            advance_pending: false,
            started_at,
        }
    }

    /// Session that starts directly in breathing and never leaves it on its own.
    pub fn breathing_only(id: String, started_at: DateTime<Utc>) -> Self {
        Self {
            mode: SessionMode::BreathingOnly,
            phase: ExercisePhase::Breathing,
            feedback_text: ExercisePhase::Breathing.intro_feedback().to_string(),
            ..Self::new(id, started_at)
        }
    }

    pub fn title(&self) -> &'static str {
        self.phase.title()
    }

    /// Apply a trigger through the transition table.
    ///
    /// Returns the entered phase, or `None` when the trigger does not apply to
    /// the current phase (the session is left untouched). Score carries over.
    pub fn apply(&mut self, trigger: Trigger) -> Option<ExercisePhase> {
        let next = next_phase(self.phase, trigger)?;

        self.phase = next;
        self.hold_counter = 0;
        self.reps_completed = 0;
        self.advance_pending = false;
        self.last_metric_pct = None;
        self.breathing_step = BreathingStep::Ready;
        if next == ExercisePhase::Breathing {
            self.breathing_cycle_index = 0;
        }
        self.feedback_text = next.intro_feedback().to_string();

        Some(next)
    }
}
