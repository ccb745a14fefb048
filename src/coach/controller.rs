use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use anyhow::{anyhow, bail, Result};
use chrono::Utc;
use serde::Serialize;
use tokio::{
    sync::{watch, Mutex},
    time,
};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::air::{outdoor_exercise_gate, OutdoorGate};
use crate::error::SessionFault;
use crate::models::LandmarkFrame;
use crate::settings::{self, ConsoleSettings};

use super::{
    breathing::BreathingScript,
    engine::{evaluate, Effect},
    gestures::GestureThresholds,
    state::{ExercisePhase, ExerciseSession, Trigger},
};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Everything the host needs to render the coach after an update.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CoachSnapshot {
    pub session: ExerciseSession,
    pub title: &'static str,
    pub fault: Option<SessionFault>,
    pub rejected_frames: u64,
    pub debug: Option<String>,
}

struct ActiveSession {
    session: ExerciseSession,
    generation: u64,
    cancel_token: CancellationToken,
    fault: Option<SessionFault>,
    rejected_frames: u64,
}

impl ActiveSession {
    /// Timers spawned for `generation` may only touch a live session of that generation.
    fn accepts(&self, generation: u64) -> bool {
        self.generation == generation && !self.cancel_token.is_cancelled()
    }
}

/// Owns one coaching session and the timers that drive its timed parts.
///
/// Frames must come from a single producer; the session is not meant to be
/// fed concurrently.
#[derive(Clone)]
pub struct CoachController {
    slot: Arc<Mutex<Option<ActiveSession>>>,
    generation: Arc<AtomicU64>,
    thresholds: GestureThresholds,
    script: BreathingScript,
    snapshot_tx: Arc<watch::Sender<Option<CoachSnapshot>>>,
    unsafe_aqi_threshold: f64,
    debug_mode: bool,
}

impl CoachController {
    pub fn new(settings: &ConsoleSettings) -> Self {
        let thresholds = GestureThresholds {
            min_visibility: settings.min_landmark_visibility,
            ..GestureThresholds::default()
        };
        Self {
            unsafe_aqi_threshold: settings.unsafe_aqi_threshold,
            ..Self::with_timing(thresholds, BreathingScript::default())
        }
    }

    pub fn with_timing(thresholds: GestureThresholds, script: BreathingScript) -> Self {
        let (snapshot_tx, _) = watch::channel(None);
        Self {
            slot: Arc::new(Mutex::new(None)),
            generation: Arc::new(AtomicU64::new(0)),
            thresholds,
            script,
            snapshot_tx: Arc::new(snapshot_tx),
            unsafe_aqi_threshold: ConsoleSettings::default().unsafe_aqi_threshold,
            debug_mode: settings::debug_enabled(),
        }
    }

    /// Receives a snapshot after every state change; `None` once closed.
    pub fn subscribe(&self) -> watch::Receiver<Option<CoachSnapshot>> {
        self.snapshot_tx.subscribe()
    }

    pub async fn snapshot(&self) -> Option<CoachSnapshot> {
        let guard = self.slot.lock().await;
        guard.as_ref().map(|active| self.snapshot_of(active))
    }

    pub async fn start_session(&self) -> Result<CoachSnapshot> {
        let (snapshot, _) = self
            .open_session(|id| ExerciseSession::new(id, Utc::now()))
            .await?;
        Ok(snapshot)
    }

    /// Camera-free 4-7-8 breathing that repeats until the session is closed.
    ///
    /// Refused while `aqi` is above the unsafe threshold.
    pub async fn start_breathing_only(&self, aqi: f64) -> Result<CoachSnapshot> {
        if outdoor_exercise_gate(aqi, self.unsafe_aqi_threshold) == OutdoorGate::Unsafe {
            bail!(
                "air quality too poor for deep breathing (AQI {aqi} > {})",
                self.unsafe_aqi_threshold
            );
        }

        let (snapshot, (generation, cancel_token)) = self
            .open_session(|id| ExerciseSession::breathing_only(id, Utc::now()))
            .await?;
        self.spawn_open_breathing(generation, cancel_token);
        Ok(snapshot)
    }

    async fn open_session(
        &self,
        build: impl FnOnce(String) -> ExerciseSession,
    ) -> Result<(CoachSnapshot, (u64, CancellationToken))> {
        let mut guard = self.slot.lock().await;
        if let Some(active) = guard.as_ref() {
            if !active.session.phase.is_terminal() && active.fault.is_none() {
                bail!("coaching session already active");
            }
            active.cancel_token.cancel();
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let session = build(Uuid::new_v4().to_string());
        log_info!("Coaching session {} started ({:?})", session.id, session.mode);

        let active = ActiveSession {
            session,
            generation,
            cancel_token: CancellationToken::new(),
            fault: None,
            rejected_frames: 0,
        };
        let timers = (generation, active.cancel_token.clone());
        let snapshot = self.publish(&active);
        *guard = Some(active);
        Ok((snapshot, timers))
    }

    /// Feed one camera frame. Bad frames are counted and otherwise ignored.
    pub async fn submit_frame(&self, frame: &LandmarkFrame) -> Result<CoachSnapshot> {
        let mut guard = self.slot.lock().await;
        let active = guard
            .as_mut()
            .ok_or_else(|| anyhow!("no active coaching session"))?;

        if active.fault.is_some() || active.cancel_token.is_cancelled() {
            return Ok(self.snapshot_of(active));
        }

        let evaluation = evaluate(&active.session, frame, &self.thresholds);
        if evaluation.rejection.is_some() {
            active.rejected_frames += 1;
            return Ok(self.snapshot_of(active));
        }

        let reps_before = active.session.reps_completed;
        active.session = evaluation.session;

        if active.session.reps_completed > reps_before {
            log_info!(
                "{} rep {}/{} (score {})",
                active.session.title(),
                active.session.reps_completed,
                self.thresholds.target_reps,
                active.session.score
            );
        }
        if let Some(phase) = evaluation.entered {
            log_info!("Session {} entered {:?}", active.session.id, phase);
        }
        if let Some(Effect::ScheduleAdvance { from, after }) = evaluation.effect {
            self.spawn_advance(active.generation, active.cancel_token.clone(), from, after);
        }

        Ok(self.publish(active))
    }

    /// Manual override: leave calibration without the hands-up hold.
    pub async fn skip_calibration(&self) -> Result<CoachSnapshot> {
        let mut guard = self.slot.lock().await;
        let active = guard
            .as_mut()
            .ok_or_else(|| anyhow!("no active coaching session"))?;

        if active.session.apply(Trigger::SkipCalibration).is_none() {
            bail!(
                "calibration can only be skipped while initializing (currently {:?})",
                active.session.phase
            );
        }
        log_info!("Session {} skipped calibration", active.session.id);
        Ok(self.publish(active))
    }

    /// Record a pose/camera failure. Pending timers are cancelled; the phase is kept.
    pub async fn report_fault(&self, fault: SessionFault) -> Result<CoachSnapshot> {
        let mut guard = self.slot.lock().await;
        let active = guard
            .as_mut()
            .ok_or_else(|| anyhow!("no active coaching session"))?;

        log_warn!("Session {} faulted: {}", active.session.id, fault);
        active.cancel_token.cancel();
        active.fault = Some(fault);
        Ok(self.publish(active))
    }

    /// Close the session. Returns its final state, or `None` if nothing was open.
    pub async fn close_session(&self) -> Result<Option<CoachSnapshot>> {
        let closed = {
            let mut guard = self.slot.lock().await;
            guard.take()
        };

        let Some(active) = closed else {
            return Ok(None);
        };

        active.cancel_token.cancel();
        self.generation.fetch_add(1, Ordering::SeqCst);
        log_info!(
            "Session {} closed in {:?} with score {}",
            active.session.id,
            active.session.phase,
            active.session.score
        );

        let snapshot = self.snapshot_of(&active);
        self.snapshot_tx.send_replace(None);
        Ok(Some(snapshot))
    }

    fn spawn_advance(
        &self,
        generation: u64,
        cancel_token: CancellationToken,
        from: ExercisePhase,
        after: Duration,
    ) {
        let controller = self.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel_token.cancelled() => return,
                _ = time::sleep(after) => {}
            }
            controller.finish_reps(generation, from).await;
        });
    }

    async fn finish_reps(&self, generation: u64, from: ExercisePhase) {
        let mut guard = self.slot.lock().await;
        let Some(active) = guard.as_mut().filter(|active| active.accepts(generation)) else {
            return;
        };
        if active.session.phase != from {
            return;
        }

        let Some(entered) = active.session.apply(Trigger::TargetRepsReached) else {
            return;
        };
        log_info!("Session {} entered {:?}", active.session.id, entered);
        self.publish(active);

        if entered == ExercisePhase::Breathing {
            self.spawn_breathing(generation, active.cancel_token.clone());
        }
    }

    fn spawn_breathing(&self, generation: u64, cancel_token: CancellationToken) {
        let controller = self.clone();
        let cues = self.script.cues();

        tokio::spawn(async move {
            for cue in cues {
                let applied = {
                    let mut guard = controller.slot.lock().await;
                    match guard.as_mut().filter(|active| active.accepts(generation)) {
                        Some(active) => {
                            let applied = active.session.apply_breathing_cue(&cue);
                            if applied {
                                controller.publish(active);
                            }
                            applied
                        }
                        None => false,
                    }
                };
                if !applied {
                    return;
                }

                tokio::select! {
                    _ = cancel_token.cancelled() => return,
                    _ = time::sleep(cue.duration) => {}
                }
            }
            controller.finish_breathing(generation).await;
        });
    }

    fn spawn_open_breathing(&self, generation: u64, cancel_token: CancellationToken) {
        let controller = self.clone();

        tokio::spawn(async move {
            for cycle in 1u32.. {
                for cue in controller.script.cycle_cues(cycle) {
                    let applied = {
                        let mut guard = controller.slot.lock().await;
                        match guard.as_mut().filter(|active| active.accepts(generation)) {
                            Some(active) => {
                                let applied = active.session.apply_breathing_cue(&cue);
                                if applied {
                                    controller.publish(active);
                                }
                                applied
                            }
                            None => false,
                        }
                    };
                    if !applied {
                        return;
                    }

                    tokio::select! {
                        _ = cancel_token.cancelled() => return,
                        _ = time::sleep(cue.duration) => {}
                    }
                }
            }
        });
    }

    async fn finish_breathing(&self, generation: u64) {
        let mut guard = self.slot.lock().await;
        let Some(active) = guard.as_mut().filter(|active| active.accepts(generation)) else {
            return;
        };
        if active.session.apply(Trigger::BreathingFinished).is_some() {
            log_info!(
                "Session {} completed with score {}",
                active.session.id,
                active.session.score
            );
            self.publish(active);
        }
    }

    fn snapshot_of(&self, active: &ActiveSession) -> CoachSnapshot {
        let session = &active.session;
        let debug = self.debug_mode.then(|| {
            format!(
                "State: {:?} | Hold: {} | Reps: {} | Metric: {:?} | Cycle: {}/{}",
                session.phase,
                session.hold_counter,
                session.reps_completed,
                session.last_metric_pct,
                session.breathing_cycle_index,
                self.script.cycles
            )
        });

        CoachSnapshot {
            session: session.clone(),
            title: session.title(),
            fault: active.fault.clone(),
            rejected_frames: active.rejected_frames,
            debug,
        }
    }

    fn publish(&self, active: &ActiveSession) -> CoachSnapshot {
        let snapshot = self.snapshot_of(active);
        self.snapshot_tx.send_replace(Some(snapshot.clone()));
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coach::gestures::{REP_HOLD_FRAMES, TARGET_REPS};
    use crate::coach::state::{BreathingStep, SessionMode};
    use crate::models::{Joint, Landmark};

    fn full_reach() -> LandmarkFrame {
        LandmarkFrame::new()
            .with(Joint::Nose, Landmark::new(0.5, 0.3))
            .with(Joint::LeftShoulder, Landmark::new(0.4, 0.5))
            .with(Joint::RightShoulder, Landmark::new(0.6, 0.5))
            .with(Joint::LeftWrist, Landmark::new(0.4, 0.05))
            .with(Joint::RightWrist, Landmark::new(0.6, 0.05))
    }

    fn open_chest() -> LandmarkFrame {
        LandmarkFrame::new()
            .with(Joint::LeftShoulder, Landmark::new(0.4, 0.5))
            .with(Joint::RightShoulder, Landmark::new(0.6, 0.5))
            .with(Joint::LeftElbow, Landmark::new(0.25, 0.5))
            .with(Joint::RightElbow, Landmark::new(0.75, 0.5))
            .with(Joint::LeftWrist, Landmark::new(0.1, 0.3))
            .with(Joint::RightWrist, Landmark::new(0.9, 0.3))
    }

    async fn feed(controller: &CoachController, frame: &LandmarkFrame, n: u32) -> CoachSnapshot {
        let mut last = None;
        for _ in 0..n {
            last = Some(controller.submit_frame(frame).await.unwrap());
        }
        last.unwrap()
    }

    async fn phase(controller: &CoachController) -> ExercisePhase {
        controller.snapshot().await.unwrap().session.phase
    }

    fn controller() -> CoachController {
        CoachController::with_timing(GestureThresholds::default(), BreathingScript::default())
    }

    #[tokio::test(start_paused = true)]
    async fn advance_waits_for_delay_and_resets_reps() {
        let controller = controller();
        controller.start_session().await.unwrap();
        controller.skip_calibration().await.unwrap();

        let snapshot = feed(&controller, &full_reach(), REP_HOLD_FRAMES * TARGET_REPS).await;
        assert_eq!(snapshot.session.reps_completed, TARGET_REPS);
        assert_eq!(snapshot.session.phase, ExercisePhase::SkyReaches);

        time::sleep(Duration::from_millis(900)).await;
        assert_eq!(phase(&controller).await, ExercisePhase::SkyReaches);

        time::sleep(Duration::from_millis(200)).await;
        let snapshot = controller.snapshot().await.unwrap();
        assert_eq!(snapshot.session.phase, ExercisePhase::ChestOpeners);
        assert_eq!(snapshot.session.reps_completed, 0);
        assert_eq!(snapshot.session.score, 45);
    }

    #[tokio::test(start_paused = true)]
    async fn breathing_steps_follow_the_clock() {
        let controller = controller();
        controller.start_session().await.unwrap();
        controller.skip_calibration().await.unwrap();
        feed(&controller, &full_reach(), REP_HOLD_FRAMES * TARGET_REPS).await;
        time::sleep(Duration::from_millis(1100)).await;
        feed(&controller, &open_chest(), REP_HOLD_FRAMES * TARGET_REPS).await;
        time::sleep(Duration::from_millis(1000)).await;
        // Breathing entered at t=1s after the last rep
        time::sleep(Duration::from_millis(100)).await;

        let snapshot = controller.snapshot().await.unwrap();
        assert_eq!(snapshot.session.phase, ExercisePhase::Breathing);
        assert_eq!(snapshot.session.breathing_step, BreathingStep::Ready);

        time::sleep(Duration::from_secs(3)).await;
        let snapshot = controller.snapshot().await.unwrap();
        assert_eq!(snapshot.session.breathing_step, BreathingStep::Inhale);
        assert_eq!(snapshot.session.breathing_cycle_index, 1);

        time::sleep(Duration::from_secs(4)).await;
        assert_eq!(
            controller.snapshot().await.unwrap().session.breathing_step,
            BreathingStep::Hold
        );

        time::sleep(Duration::from_secs(60)).await;
        let snapshot = controller.snapshot().await.unwrap();
        assert_eq!(snapshot.session.phase, ExercisePhase::Completed);
        assert_eq!(snapshot.session.score, 90);
    }

    #[tokio::test(start_paused = true)]
    async fn fault_stops_pending_advance() {
        let controller = controller();
        controller.start_session().await.unwrap();
        controller.skip_calibration().await.unwrap();
        feed(&controller, &full_reach(), REP_HOLD_FRAMES * TARGET_REPS).await;

        let snapshot = controller
            .report_fault(SessionFault::CameraUnavailable("device busy".into()))
            .await
            .unwrap();
        assert!(snapshot.fault.is_some());

        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(phase(&controller).await, ExercisePhase::SkyReaches);
    }

    #[tokio::test(start_paused = true)]
    async fn breathing_only_repeats_until_closed() {
        let controller = controller();
        let snapshot = controller.start_breathing_only(80.0).await.unwrap();
        assert_eq!(snapshot.session.mode, SessionMode::BreathingOnly);
        assert_eq!(snapshot.session.phase, ExercisePhase::Breathing);

        time::sleep(Duration::from_millis(500)).await;
        let snapshot = controller.snapshot().await.unwrap();
        assert_eq!(snapshot.session.breathing_step, BreathingStep::Inhale);
        assert_eq!(snapshot.session.breathing_cycle_index, 1);

        // Well past the three cycles of a guided session.
        time::sleep(Duration::from_secs(19 * 4)).await;
        let snapshot = controller.snapshot().await.unwrap();
        assert_eq!(snapshot.session.phase, ExercisePhase::Breathing);
        assert_eq!(snapshot.session.breathing_cycle_index, 5);
        assert_eq!(snapshot.session.breathing_step, BreathingStep::Inhale);
        assert_eq!(snapshot.session.score, 0);

        assert!(controller.start_session().await.is_err());

        let mut updates = controller.subscribe();
        controller.close_session().await.unwrap();
        assert!(updates.borrow_and_update().is_none());

        time::sleep(Duration::from_secs(60)).await;
        assert!(!updates.has_changed().unwrap());
    }

    #[tokio::test]
    async fn breathing_only_refused_in_unsafe_air() {
        let controller = controller();
        assert!(controller.start_breathing_only(151.0).await.is_err());
        assert!(controller.snapshot().await.is_none());

        let settings = ConsoleSettings {
            unsafe_aqi_threshold: 100.0,
            ..ConsoleSettings::default()
        };
        let strict = CoachController::new(&settings);
        assert!(strict.start_breathing_only(120.0).await.is_err());
        assert!(strict.start_breathing_only(150.0).await.is_err());
        assert!(controller.start_breathing_only(150.0).await.is_ok());
    }

    #[tokio::test]
    async fn rejected_frames_are_counted_not_applied() {
        let controller = controller();
        controller.start_session().await.unwrap();
        let snapshot = controller.submit_frame(&LandmarkFrame::new()).await.unwrap();
        assert_eq!(snapshot.rejected_frames, 1);
        assert_eq!(snapshot.session.hold_counter, 0);
        assert_eq!(snapshot.session.phase, ExercisePhase::Initializing);
    }

    #[tokio::test]
    async fn lifecycle_errors_are_reported() {
        let controller = controller();
        assert!(controller.submit_frame(&full_reach()).await.is_err());
        assert!(controller.close_session().await.unwrap().is_none());

        controller.start_session().await.unwrap();
        assert!(controller.start_session().await.is_err());
        controller.skip_calibration().await.unwrap();
        assert!(controller.skip_calibration().await.is_err());

        let closed = controller.close_session().await.unwrap().unwrap();
        assert_eq!(closed.session.phase, ExercisePhase::SkyReaches);
        assert!(controller.snapshot().await.is_none());
        assert!(controller.subscribe().borrow().is_none());
    }
}
