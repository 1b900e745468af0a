use bba_abr::{AbrEvent, Bba0, Bba1, BbaController, BbaOptions, Ladder};
use bba_events::EventBus;
use bba_test_utils::{SessionSim, ladder};
use rstest::rstest;

#[rstest]
#[tokio::test]
async fn two_sessions_share_one_bus(ladder: Ladder) {
    let bus = EventBus::new(1024);
    let mut rx = bus.subscribe();

    let sim0 = SessionSim::new(ladder.clone(), 2.0, 60.0);
    let sim1 = SessionSim::new(ladder, 2.0, 60.0).with_chunk_tables(16, 0.1, 5);
    let mut bba0 = BbaController::with_sink(BbaOptions::default(), Bba0, bus.clone()).unwrap();
    let mut bba1 = BbaController::with_sink(BbaOptions::bba1(), Bba1, bus.clone()).unwrap();

    sim0.run(&mut bba0, &[900.0; 10]);
    sim1.run(&mut bba1, &[900.0; 10]);
    drop((bba0, bba1, bus));

    let mut actions = [0_usize; 2];
    let mut decisions = 0;
    while let Ok(event) = rx.recv().await {
        match event {
            AbrEvent::ControlAction { policy: "bba0", .. } => actions[0] += 1,
            AbrEvent::ControlAction { policy: "bba1", .. } => actions[1] += 1,
            AbrEvent::LevelDecision { .. } => decisions += 1,
            _ => {}
        }
    }

    assert_eq!(actions, [10, 10]);
    assert_eq!(decisions, 20);
}
