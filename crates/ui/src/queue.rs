use audmon_meter::LevelFrame;
use ringbuf::{HeapConsumer, HeapProducer, HeapRb};
use tracing::trace;

/// Level updates queued per UI redraw before new ones are dropped.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Single-producer/single-consumer hand-off from the audio callback to the UI
/// loop. Pushing never blocks or allocates.
pub fn update_queue(capacity: usize) -> (UpdateSender, UpdateReceiver) {
    let (producer, consumer) = HeapRb::<LevelFrame>::new(capacity.max(1)).split();
    (
        UpdateSender {
            producer,
            dropped: 0,
        },
        UpdateReceiver { consumer },
    )
}

pub struct UpdateSender {
    producer: HeapProducer<LevelFrame>,
    dropped: u64,
}

impl UpdateSender {
    /// Queues `frame` for the UI. Returns `false` if the UI is behind and the
    /// frame was dropped; the next period supersedes it anyway.
    pub fn submit(&mut self, frame: LevelFrame) -> bool {
        match self.producer.push(frame) {
            Ok(()) => true,
            Err(_) => {
                self.dropped += 1;
                trace!(dropped = self.dropped, "ui queue full, dropping level update");
                false
            }
        }
    }

    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

pub struct UpdateReceiver {
    consumer: HeapConsumer<LevelFrame>,
}

impl UpdateReceiver {
    pub fn pop(&mut self) -> Option<LevelFrame> {
        self.consumer.pop()
    }

    pub fn is_empty(&self) -> bool {
        self.consumer.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use audmon_meter::ClipState;

    use super::*;

    fn frame(volume: f32) -> LevelFrame {
        LevelFrame {
            volume,
            ..Default::default()
        }
    }

    #[test]
    fn updates_arrive_in_order() {
        let (mut tx, mut rx) = update_queue(8);
        assert!(rx.is_empty());
        tx.submit(frame(0.1));
        tx.submit(LevelFrame {
            clip: ClipState::ClippedRecently,
            ..frame(0.2)
        });
        assert_eq!(rx.pop().map(|f| f.volume), Some(0.1));
        let second = rx.pop().unwrap();
        assert!(second.clipped_recently());
        assert_eq!(rx.pop(), None);
    }

    #[test]
    fn full_queue_drops_new_updates() {
        let (mut tx, mut rx) = update_queue(2);
        assert!(tx.submit(frame(0.1)));
        assert!(tx.submit(frame(0.2)));
        assert!(!tx.submit(frame(0.3)));
        assert_eq!(tx.dropped(), 1);
        assert_eq!(rx.pop().map(|f| f.volume), Some(0.1));
        assert!(tx.submit(frame(0.4)));
    }

    #[test]
    fn producer_works_across_threads() {
        let (mut tx, mut rx) = update_queue(DEFAULT_QUEUE_CAPACITY);
        std::thread::spawn(move || {
            for i in 0..10 {
                tx.submit(frame(i as f32 / 10.0));
            }
        })
        .join()
        .unwrap();
        let received: Vec<f32> = std::iter::from_fn(|| rx.pop()).map(|f| f.volume).collect();
        assert_eq!(received.len(), 10);
        assert_eq!(received[9], 0.9);
    }
}
