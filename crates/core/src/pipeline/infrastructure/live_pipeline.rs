use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crossbeam_channel::Receiver;

use crate::capture::domain::frame_source::{CaptureError, CaptureFormat, FrameSource};
use crate::detection::domain::face_detector::FaceDetector;
use crate::pipeline::events::DetectionEvent;
use crate::pipeline::frame_gate::{AdmittedFrame, DetectionSlot, FrameGate, GateStats};

/// Owns the capture and detection threads behind a follower session.
///
/// Layout: `capture → gate → detect → events`
///
/// The source opens on the calling thread so a missing device fails fast,
/// before any thread exists. Capture then pushes frames through the gate
/// at the source's cadence while the detection worker runs one frame at a
/// time, posting a completion event per cycle; the event receiver is the
/// only road into the serialized session state.
pub struct LivePipeline {
    format: CaptureFormat,
    events: Receiver<DetectionEvent>,
    stats: GateStats,
    slot: DetectionSlot,
    cancelled: Arc<AtomicBool>,
    capture_handle: JoinHandle<Box<dyn FrameSource>>,
    detect_handle: JoinHandle<Box<dyn FaceDetector>>,
}

impl LivePipeline {
    /// Opens the source and starts both worker threads.
    ///
    /// `CaptureError::DeviceUnavailable` surfaces here, synchronously, and
    /// is fatal: no thread is spawned.
    pub fn spawn(
        mut source: Box<dyn FrameSource>,
        detector: Box<dyn FaceDetector>,
    ) -> Result<LivePipeline, CaptureError> {
        let format = source.open()?;
        log::info!(
            "live pipeline starting: {}x{} at {:.0} fps",
            format.width,
            format.height,
            format.fps
        );

        let (frame_tx, frame_rx) = crossbeam_channel::bounded::<AdmittedFrame>(1);
        let (event_tx, event_rx) = crossbeam_channel::unbounded::<DetectionEvent>();
        let cancelled = Arc::new(AtomicBool::new(false));

        let gate = FrameGate::new(frame_tx);
        let stats = gate.stats();
        let slot = gate.slot();

        let capture_handle = spawn_capture(source, gate, format, cancelled.clone());
        let detect_handle = spawn_detector(detector, frame_rx, event_tx);

        Ok(LivePipeline {
            format,
            events: event_rx,
            stats,
            slot,
            cancelled,
            capture_handle,
            detect_handle,
        })
    }

    pub fn format(&self) -> CaptureFormat {
        self.format
    }

    /// Completion stream for the follower session. Clone it out before
    /// calling `stop`.
    pub fn events(&self) -> Receiver<DetectionEvent> {
        self.events.clone()
    }

    /// Live gate counters.
    pub fn stats(&self) -> GateStats {
        self.stats.clone()
    }

    /// Shared view of the in-flight slot, for operational monitoring.
    pub fn slot(&self) -> DetectionSlot {
        self.slot.clone()
    }

    /// Cancels both threads, joins them, and hands the components back.
    pub fn stop(
        self,
    ) -> Result<(Box<dyn FrameSource>, Box<dyn FaceDetector>), Box<dyn std::error::Error>> {
        self.cancelled.store(true, Ordering::Relaxed);
        drop(self.events);

        let source = self.capture_handle.join();
        let detector = self.detect_handle.join();
        match (source, detector) {
            (Ok(source), Ok(detector)) => Ok((source, detector)),
            (Err(_), _) => Err("Capture thread panicked".into()),
            (_, Err(_)) => Err("Detect thread panicked".into()),
        }
    }
}

fn spawn_capture(
    mut source: Box<dyn FrameSource>,
    mut gate: FrameGate,
    format: CaptureFormat,
    cancelled: Arc<AtomicBool>,
) -> JoinHandle<Box<dyn FrameSource>> {
    thread::spawn(move || {
        let interval = format.frame_interval();
        let mut next_capture = Instant::now();
        while !cancelled.load(Ordering::Relaxed) {
            match source.next_frame() {
                Ok(Some(frame)) => {
                    gate.submit(frame);
                }
                Ok(None) => break,
                Err(e) => {
                    // Transient; the next cadence tick retries.
                    log::warn!("frame capture failed: {e}");
                }
            }

            next_capture += interval;
            let now = Instant::now();
            if next_capture > now {
                thread::sleep(next_capture - now);
            } else {
                // Capture fell behind; realign instead of bursting.
                next_capture = now;
            }
        }
        log::debug!("capture thread exiting");
        source.close();
        source
    })
}

fn spawn_detector(
    mut detector: Box<dyn FaceDetector>,
    frame_rx: Receiver<AdmittedFrame>,
    event_tx: crossbeam_channel::Sender<DetectionEvent>,
) -> JoinHandle<Box<dyn FaceDetector>> {
    thread::spawn(move || {
        for admitted in frame_rx {
            let AdmittedFrame { frame, seq, guard } = admitted;
            let started = Instant::now();
            let observations = match detector.detect(&frame) {
                Ok(observations) => observations,
                Err(e) => {
                    log::warn!("detection cycle {seq} failed, treating as no faces: {e}");
                    Vec::new()
                }
            };
            let _ = event_tx.send(DetectionEvent {
                seq,
                observations,
                elapsed: started.elapsed(),
            });
            // The slot re-opens only after the completion event is posted,
            // and it re-opens no matter how the cycle ended.
            drop(guard);
        }
        log::debug!("detection thread exiting");
        detector
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::infrastructure::synthetic_camera::SyntheticCamera;
    use crate::detection::domain::face_detector::DetectionError;
    use crate::detection::domain::observation::Observation;
    use crate::detection::infrastructure::blob_detector::BlobDetector;
    use crate::shared::frame::Frame;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    // --- Stubs ---

    struct StubSource {
        frames_left: u64,
        fps: f64,
        next_index: u64,
        fail_every: Option<u64>,
    }

    impl StubSource {
        fn new(frames: u64, fps: f64) -> Self {
            Self {
                frames_left: frames,
                fps,
                next_index: 0,
                fail_every: None,
            }
        }

        fn failing_every(mut self, n: u64) -> Self {
            self.fail_every = Some(n);
            self
        }
    }

    impl FrameSource for StubSource {
        fn open(&mut self) -> Result<CaptureFormat, CaptureError> {
            Ok(CaptureFormat {
                width: 8,
                height: 8,
                fps: self.fps,
            })
        }

        fn next_frame(&mut self) -> Result<Option<Frame>, CaptureError> {
            if self.frames_left == 0 {
                return Ok(None);
            }
            self.frames_left -= 1;
            let index = self.next_index;
            self.next_index += 1;
            if self.fail_every.is_some_and(|n| index % n == n - 1) {
                return Err(CaptureError::Failed(format!("transient fault at {index}")));
            }
            Ok(Some(Frame::new(
                vec![0u8; 8 * 8 * 3],
                8,
                8,
                3,
                index,
                Instant::now(),
            )))
        }

        fn close(&mut self) {}
    }

    struct NoDeviceSource;

    impl FrameSource for NoDeviceSource {
        fn open(&mut self) -> Result<CaptureFormat, CaptureError> {
            Err(CaptureError::DeviceUnavailable("unplugged".to_string()))
        }

        fn next_frame(&mut self) -> Result<Option<Frame>, CaptureError> {
            Ok(None)
        }

        fn close(&mut self) {}
    }

    struct FixedDetector {
        result: Vec<Observation>,
    }

    impl FaceDetector for FixedDetector {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<Observation>, DetectionError> {
            Ok(self.result.clone())
        }
    }

    struct BrokenDetector;

    impl FaceDetector for BrokenDetector {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<Observation>, DetectionError> {
            Err(DetectionError::Failed("model exploded".to_string()))
        }
    }

    struct CountingDetector {
        in_detect: Arc<AtomicUsize>,
        peak: Arc<AtomicUsize>,
        hold: Duration,
    }

    impl FaceDetector for CountingDetector {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<Observation>, DetectionError> {
            let depth = self.in_detect.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(depth, Ordering::SeqCst);
            thread::sleep(self.hold);
            self.in_detect.fetch_sub(1, Ordering::SeqCst);
            Ok(vec![Observation::new(0.4, 0.4, 0.6, 0.6)])
        }
    }

    struct BlockingDetector {
        release: Receiver<()>,
    }

    impl FaceDetector for BlockingDetector {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<Observation>, DetectionError> {
            // Blocks until released; once the sender is gone it never
            // blocks again.
            let _ = self.release.recv();
            Ok(Vec::new())
        }
    }

    // --- Helpers ---

    fn observation() -> Observation {
        Observation::new(0.2, 0.3, 0.6, 0.5)
    }

    // --- Tests ---

    #[test]
    fn test_missing_device_fails_before_threads() {
        let result = LivePipeline::spawn(
            Box::new(NoDeviceSource),
            Box::new(FixedDetector {
                result: vec![observation()],
            }),
        );
        match result {
            Err(CaptureError::DeviceUnavailable(_)) => {}
            other => panic!("expected DeviceUnavailable, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_events_flow_in_dispatch_order() {
        let pipeline = LivePipeline::spawn(
            Box::new(StubSource::new(20, 500.0)),
            Box::new(FixedDetector {
                result: vec![observation()],
            }),
        )
        .unwrap();
        assert_eq!(pipeline.format().fps, 500.0);

        // Stream ends on its own; the worker disconnects after draining.
        let events: Vec<DetectionEvent> = pipeline.events().iter().collect();
        let stats = pipeline.stats();
        pipeline.stop().unwrap();

        assert_eq!(events.len() as u64, stats.admitted());
        assert!(!events.is_empty());
        for (i, event) in events.iter().enumerate() {
            assert_eq!(event.seq, i as u64);
            assert_eq!(event.observations.len(), 1);
        }
        assert_eq!(stats.submitted(), 20);
    }

    #[test]
    fn test_detector_failure_releases_slot_and_posts_empty_event() {
        let pipeline =
            LivePipeline::spawn(Box::new(StubSource::new(12, 500.0)), Box::new(BrokenDetector))
                .unwrap();

        let events: Vec<DetectionEvent> = pipeline.events().iter().collect();
        let stats = pipeline.stats();
        pipeline.stop().unwrap();

        // Failures still produce one event per cycle, with no faces, and
        // the gate keeps admitting afterwards.
        assert!(events.len() >= 2, "gate never re-opened after a failure");
        assert!(events.iter().all(|e| e.observations.is_empty()));
        assert_eq!(events.len() as u64, stats.admitted());
    }

    #[test]
    fn test_capture_faults_are_retried() {
        let pipeline = LivePipeline::spawn(
            Box::new(StubSource::new(12, 500.0).failing_every(3)),
            Box::new(FixedDetector {
                result: vec![observation()],
            }),
        )
        .unwrap();

        let events: Vec<DetectionEvent> = pipeline.events().iter().collect();
        let stats = pipeline.stats();
        pipeline.stop().unwrap();

        // Faulted ticks produce no frame at all; every survivor flows.
        assert_eq!(stats.submitted(), 8);
        assert_eq!(events.len() as u64, stats.admitted());
        assert!(!events.is_empty());
    }

    #[test]
    fn test_at_most_one_detection_in_flight_under_load() {
        let in_detect = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let pipeline = LivePipeline::spawn(
            Box::new(StubSource::new(60, 1000.0)),
            Box::new(CountingDetector {
                in_detect: Arc::clone(&in_detect),
                peak: Arc::clone(&peak),
                hold: Duration::from_millis(5),
            }),
        )
        .unwrap();

        let events: Vec<DetectionEvent> = pipeline.events().iter().collect();
        let stats = pipeline.stats();
        pipeline.stop().unwrap();

        assert_eq!(peak.load(Ordering::SeqCst), 1);
        assert_eq!(stats.submitted(), 60);
        assert_eq!(stats.admitted() + stats.dropped(), 60);
        // Detection at 5ms against a 1ms cadence must shed frames.
        assert!(stats.dropped() > 0, "expected drops under load");
        assert_eq!(events.len() as u64, stats.admitted());
    }

    #[test]
    fn test_hung_detector_keeps_gate_shut_without_queueing() {
        let (release_tx, release_rx) = crossbeam_channel::bounded(1);
        let pipeline = LivePipeline::spawn(
            Box::new(StubSource::new(10_000, 1000.0)),
            Box::new(BlockingDetector {
                release: release_rx,
            }),
        )
        .unwrap();
        let events = pipeline.events();
        let slot = pipeline.slot();

        // Give capture time to admit one frame and pile up drops behind it.
        thread::sleep(Duration::from_millis(40));
        let stats = pipeline.stats();
        assert_eq!(stats.admitted(), 1);
        assert!(stats.dropped() > 1);
        assert!(slot.is_in_flight());
        assert!(slot.in_flight_age().unwrap() >= Duration::from_millis(10));
        assert!(events.is_empty());

        // Unblock: the held cycle completes and the pipeline resumes.
        release_tx.send(()).unwrap();
        drop(release_tx);
        let first = events.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(first.seq, 0);

        pipeline.stop().unwrap();
    }

    #[test]
    fn test_synthetic_camera_to_blob_detector_end_to_end() {
        let pipeline = LivePipeline::spawn(
            Box::new(SyntheticCamera::new(64, 48, 250.0)),
            Box::new(BlobDetector::new()),
        )
        .unwrap();
        let events = pipeline.events();

        for _ in 0..5 {
            let event = events.recv_timeout(Duration::from_secs(2)).unwrap();
            assert_eq!(event.observations.len(), 1);
            assert!(event.elapsed > Duration::ZERO);
        }

        let (mut source, _detector) = pipeline.stop().unwrap();
        // Components come back usable.
        assert!(source.open().is_ok());
    }
}
