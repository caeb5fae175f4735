use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tracing::{debug, trace};

const CLIPPED: u64 = 1;
const GENERATION_STEP: u64 = 2;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ClipState {
    #[default]
    Clear,
    ClippedRecently,
}

/// Clip bit in the low bit, generation counter above it. Keeping both in one
/// word lets a reset clear the bit only if no clip event happened since it was
/// armed.
#[derive(Debug, Default)]
struct ClipFlag {
    word: AtomicU64,
}

impl ClipFlag {
    /// Sets the clip bit, bumps the generation and returns the new word.
    fn arm(&self) -> u64 {
        let bump = |word: u64| (word | CLIPPED).wrapping_add(GENERATION_STEP);
        let previous = self
            .word
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |word| Some(bump(word)))
            .unwrap_or_else(|word| word);
        bump(previous)
    }

    /// Clears the clip bit if the word is still exactly `armed`.
    fn disarm(&self, armed: u64) -> bool {
        self.word
            .compare_exchange(armed, armed & !CLIPPED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn is_set(&self) -> bool {
        self.word.load(Ordering::Acquire) & CLIPPED != 0
    }
}

/// Flags "clipped recently" for a fixed hold time after the latest clip event.
///
/// Every clip event restarts the hold. Resets run as detached tasks on the
/// given runtime, so [`ClipTracker::indicate_clipping`] never blocks and can be
/// called from the audio driver's thread.
#[derive(Clone, Debug)]
pub struct ClipTracker {
    flag: Arc<ClipFlag>,
    hold: Duration,
    runtime: Handle,
}

impl ClipTracker {
    pub fn new(hold: Duration, runtime: Handle) -> Self {
        Self {
            flag: Arc::new(ClipFlag::default()),
            hold,
            runtime,
        }
    }

    pub fn indicate_clipping(&self) {
        let armed = self.flag.arm();
        trace!(generation = armed >> 1, "clip event");

        let flag = Arc::clone(&self.flag);
        let hold = self.hold;
        self.runtime.spawn(async move {
            tokio::time::sleep(hold).await;
            if flag.disarm(armed) {
                debug!("clip warning expired");
            }
        });
    }

    pub fn clipped_recently(&self) -> bool {
        self.flag.is_set()
    }

    pub fn state(&self) -> ClipState {
        if self.clipped_recently() {
            ClipState::ClippedRecently
        } else {
            ClipState::Clear
        }
    }
}
