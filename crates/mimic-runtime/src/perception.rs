//! Latest perception result, shared by one writer and any number of readers.

use tokio::sync::watch;

use mimic_core::{EmotionLabel, FaceRegion};

/// What the classifier reported for the most recent cycle. Published and
/// read as one value, so label and region always belong to the same frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PerceptionSnapshot {
    /// Perception cycles completed when this was published. 0 before the
    /// first cycle.
    pub cycle: u64,
    pub label: Option<EmotionLabel>,
    pub region: Option<FaceRegion>,
}

/// Create the writer/reader pair. Both start at the empty snapshot.
pub fn perception_state() -> (PerceptionWriter, PerceptionReader) {
    let (tx, rx) = watch::channel(PerceptionSnapshot::default());
    (PerceptionWriter { tx, cycle: 0 }, PerceptionReader { rx })
}

/// The single writer. Not `Clone`.
pub struct PerceptionWriter {
    tx: watch::Sender<PerceptionSnapshot>,
    cycle: u64,
}

impl PerceptionWriter {
    /// Replace the snapshot. Succeeds whether or not anyone is reading.
    pub fn publish(
        &mut self,
        label: Option<EmotionLabel>,
        region: Option<FaceRegion>,
    ) -> PerceptionSnapshot {
        self.cycle += 1;
        let snapshot = PerceptionSnapshot {
            cycle: self.cycle,
            label,
            region,
        };
        self.tx.send_replace(snapshot);
        snapshot
    }

    /// Publish "nothing seen".
    pub fn clear(&mut self) -> PerceptionSnapshot {
        self.publish(None, None)
    }

    pub fn reader(&self) -> PerceptionReader {
        PerceptionReader {
            rx: self.tx.subscribe(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct PerceptionReader {
    rx: watch::Receiver<PerceptionSnapshot>,
}

impl PerceptionReader {
    pub fn snapshot(&self) -> PerceptionSnapshot {
        *self.rx.borrow()
    }

    pub fn label(&self) -> Option<EmotionLabel> {
        self.rx.borrow().label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        let (_w, r) = perception_state();
        assert_eq!(r.snapshot(), PerceptionSnapshot::default());
        assert_eq!(r.label(), None);
    }

    #[test]
    fn test_publish_replaces_whole_snapshot() {
        let (mut w, r) = perception_state();
        let region = FaceRegion::new(1, 2, 3, 4);
        w.publish(Some(EmotionLabel::Joy), Some(region));
        assert_eq!(r.snapshot().region, Some(region));

        w.clear();
        let s = r.snapshot();
        assert_eq!(s.cycle, 2);
        assert_eq!(s.label, None);
        assert_eq!(s.region, None);
    }

    #[test]
    fn test_publish_without_readers() {
        let (mut w, r) = perception_state();
        drop(r);
        let s = w.publish(Some(EmotionLabel::Fear), None);
        assert_eq!(s.cycle, 1);
        assert_eq!(w.reader().label(), Some(EmotionLabel::Fear));
    }

    #[test]
    fn test_readers_never_see_a_torn_value() {
        // Every published snapshot satisfies region.x == cycle and
        // label == ALL[cycle % 6]; a mixed read would break that.
        let (mut w, r) = perception_state();
        let writer = std::thread::spawn(move || {
            for i in 1..=20_000u64 {
                let label = EmotionLabel::ALL[(i % 6) as usize];
                w.publish(Some(label), Some(FaceRegion::new(i as i32, 0, 1, 1)));
            }
        });
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let r = r.clone();
                std::thread::spawn(move || {
                    for _ in 0..20_000 {
                        let s = r.snapshot();
                        if s.cycle == 0 {
                            continue;
                        }
                        assert_eq!(s.region.map(|g| g.x as u64), Some(s.cycle));
                        assert_eq!(s.label, Some(EmotionLabel::ALL[(s.cycle % 6) as usize]));
                    }
                })
            })
            .collect();
        writer.join().unwrap();
        for h in readers {
            h.join().unwrap();
        }
    }
}
