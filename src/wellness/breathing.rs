use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::utils::clock::Clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreathingPhase {
    pub text: &'static str,
    pub duration: Duration,
}

pub const BREATHING_CYCLE: [BreathingPhase; 4] = [
    BreathingPhase {
        text: "Get Ready...",
        duration: Duration::from_secs(2),
    },
    BreathingPhase {
        text: "Breathe In",
        duration: Duration::from_secs(4),
    },
    BreathingPhase {
        text: "Hold",
        duration: Duration::from_secs(4),
    },
    BreathingPhase {
        text: "Breathe Out",
        duration: Duration::from_secs(6),
    },
];

/// Endless sequence of breathing phases. After "Breathe Out" it starts over with "Get Ready...".
#[derive(Debug, Default, Clone)]
pub struct BreathingSession {
    index: usize,
}

impl Iterator for BreathingSession {
    type Item = BreathingPhase;

    fn next(&mut self) -> Option<Self::Item> {
        let phase = BREATHING_CYCLE[self.index];
        self.index = (self.index + 1) % BREATHING_CYCLE.len();
        Some(phase)
    }
}

/// Guides through `phases` phases, calling `on_phase` when each one starts. Returns how many
/// phases were completed before `cancel` fired.
pub async fn run_breathing(
    clock: &dyn Clock,
    phases: usize,
    cancel: &CancellationToken,
    mut on_phase: impl FnMut(&BreathingPhase),
) -> usize {
    let mut phase_end = clock.instant();
    for (completed, phase) in BreathingSession::default().take(phases).enumerate() {
        on_phase(&phase);
        phase_end += phase.duration;
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("Breathing stopped after {completed} phases");
                return completed;
            }
            _ = clock.sleep_until(phase_end) => ()
        }
    }
    phases
}
