use bba_abr::{
    AbrError, AbrEvent, Bba1, BbaController, BbaOptions, ChunkFeedback, Fallback, Fault, Ladder,
    SegmentDescriptor,
};
use bba_events::EventBus;
use bba_test_utils::{SessionSim, feedback_at, ladder, tracing_setup};
use rstest::rstest;
use tokio::sync::broadcast::Receiver;

fn drain(rx: &mut Receiver<AbrEvent>) -> Vec<AbrEvent> {
    std::iter::from_fn(|| rx.try_recv().ok()).collect()
}

fn faults(events: &[AbrEvent]) -> Vec<&Fault> {
    events
        .iter()
        .filter_map(|e| match e {
            AbrEvent::Fault(f) => Some(f),
            _ => None,
        })
        .collect()
}

#[rstest]
fn running_past_the_chunk_table_falls_back_to_bba0_bounds(_tracing_setup: (), ladder: Ladder) {
    let bus = EventBus::new(4096);
    let mut rx = bus.subscribe();
    let sim = SessionSim::new(ladder.clone(), 2.0, 60.0).with_chunk_tables(10, 0.1, 9);
    let mut c = BbaController::with_sink(BbaOptions::bba1(), Bba1, bus).unwrap();

    let report = sim.run(&mut c, &[3000.0; 20]);
    let events = drain(&mut rx);

    assert_eq!(report.decisions.len(), 20);
    let missing: Vec<_> = faults(&events)
        .into_iter()
        .filter(|f| matches!(f.error, AbrError::MissingSegment { .. }))
        .collect();
    // segments 11..=21 are requested but only 10 exist, on every level
    assert_eq!(missing.len(), 11 * ladder.len());
    assert!(missing.iter().all(|f| f.fallback == Fallback::Bba0Bounds));
}

#[rstest]
fn malformed_range_is_reported_per_level(_tracing_setup: (), ladder: Ladder) {
    let bus = EventBus::new(64);
    let mut rx = bus.subscribe();
    let sim = SessionSim::new(ladder.clone(), 2.0, 60.0).with_chunk_tables(4, 0.0, 1);
    let mut playlists = sim.playlists().unwrap();
    playlists[0].segments[1] = SegmentDescriptor::new("200_400");
    playlists[4].segments[1] = SegmentDescriptor::new("x-y");

    let mut feedback = feedback_at(ladder, 2, 30.0);
    feedback.chunks = Some(ChunkFeedback {
        bandwidth_estimate: 2000.0,
        last_fragment_bytes: 1000,
        segment_number: 2,
        playlists,
    });

    let mut c = BbaController::with_sink(BbaOptions::bba1(), Bba1, bus).unwrap();
    let d = c.decide(&feedback);
    assert!(d.target_level < 5);

    let events = drain(&mut rx);
    let reported: Vec<_> = faults(&events).into_iter().cloned().collect();
    assert_eq!(
        reported,
        vec![
            Fault {
                error: AbrError::MalformedByteRange {
                    level: 0,
                    range: "200_400".to_string()
                },
                fallback: Fallback::Bba0Bounds,
            },
            Fault {
                error: AbrError::MalformedByteRange {
                    level: 4,
                    range: "x-y".to_string()
                },
                fallback: Fallback::Bba0Bounds,
            },
        ]
    );
}

#[rstest]
fn missing_chunk_feedback_forces_minimum(_tracing_setup: (), ladder: Ladder) {
    let bus = EventBus::new(64);
    let mut rx = bus.subscribe();
    let mut c = BbaController::with_sink(BbaOptions::bba1(), Bba1, bus).unwrap();

    let d = c.decide(&feedback_at(ladder, 3, 50.0));
    assert_eq!(d.target_level, 0);
    assert_eq!(d.rate, 100.0);

    let events = drain(&mut rx);
    assert_eq!(
        faults(&events),
        vec![&Fault {
            error: AbrError::MissingChunkFeedback,
            fallback: Fallback::MinRate,
        }]
    );
}
