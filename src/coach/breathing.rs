//! The 4-7-8 breathing script as plain data.
//!
//! The controller walks the cues on wall-clock timers; nothing here sleeps.

use std::time::Duration;

use super::state::{BreathingStep, ExercisePhase, ExerciseSession};

#[derive(Debug, Clone)]
pub struct BreathingScript {
    pub preparation: Duration,
    pub inhale: Duration,
    pub hold: Duration,
    pub exhale: Duration,
    pub cycles: u32,
}

impl Default for BreathingScript {
    fn default() -> Self {
        Self {
            preparation: Duration::from_secs(3),
            inhale: Duration::from_secs(4),
            hold: Duration::from_secs(7),
            exhale: Duration::from_secs(8),
            cycles: 3,
        }
    }
}

/// One timed step: applied on entry, then held for `duration`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreathingCue {
    pub step: BreathingStep,
    /// 1-based cycle number; 0 during preparation.
    pub cycle: u32,
    pub duration: Duration,
    pub feedback: &'static str,
}

impl BreathingScript {
    /// Preparation cue followed by `cycles` rounds.
    pub fn cues(&self) -> Vec<BreathingCue> {
        let mut cues = Vec::with_capacity(1 + self.cycles as usize * 3);
        cues.push(BreathingCue {
            step: BreathingStep::Ready,
            cycle: 0,
            duration: self.preparation,
            feedback: "Get comfortable for deep breathing...",
        });
        for cycle in 1..=self.cycles {
            cues.extend(self.cycle_cues(cycle));
        }
        cues
    }

    /// Inhale, hold and exhale for one round.
    pub fn cycle_cues(&self, cycle: u32) -> [BreathingCue; 3] {
        [
            BreathingCue {
                step: BreathingStep::Inhale,
                cycle,
                duration: self.inhale,
                feedback: "Inhale deeply through your nose...",
            },
            BreathingCue {
                step: BreathingStep::Hold,
                cycle,
                duration: self.hold,
                feedback: "Hold your breath...",
            },
            BreathingCue {
                step: BreathingStep::Exhale,
                cycle,
                duration: self.exhale,
                feedback: "Exhale slowly through your mouth...",
            },
        ]
    }

    pub fn cycle_duration(&self) -> Duration {
        self.inhale + self.hold + self.exhale
    }

    pub fn total_duration(&self) -> Duration {
        self.preparation + self.cycle_duration() * self.cycles
    }
}

impl ExerciseSession {
    /// Show a breathing cue. Score is never touched here.
    ///
    /// Returns false (and changes nothing) outside the breathing phase.
    pub fn apply_breathing_cue(&mut self, cue: &BreathingCue) -> bool {
        if self.phase != ExercisePhase::Breathing {
            return false;
        }
        self.breathing_step = cue.step;
        self.breathing_cycle_index = cue.cycle;
        self.feedback_text = cue.feedback.to_string();
        true
    }
}
