//! Pose-driven breathing coach.
//!
//! `engine::evaluate` is the pure per-frame transition; `controller` owns the
//! live session and the wall-clock parts (advance delay, breathing script).

pub mod breathing;
pub mod controller;
pub mod engine;
pub mod gestures;
pub mod state;

pub use breathing::{BreathingCue, BreathingScript};
pub use controller::{CoachController, CoachSnapshot};
pub use engine::{evaluate, Effect, Evaluation, PHASE_ADVANCE_DELAY};
pub use gestures::{GestureThresholds, REP_HOLD_FRAMES, REP_SCORE, TARGET_REPS};
pub use state::{next_phase, BreathingStep, ExercisePhase, ExerciseSession, SessionMode, Trigger};
