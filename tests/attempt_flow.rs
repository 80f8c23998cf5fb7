//! End-to-end attempts: pointer samples in, CSV store out

use std::fs;

use shape_trace::feedback::RecordingSink;
use shape_trace::record::HEADER;
use shape_trace::{
    DeviceInfo, PointerSample, Rect, RecordStore, ShapeKind, StepOutcome, TraceConfig,
    TraceSession,
};

const SCREEN: (u32, u32) = (390, 844);

fn canvas() -> Rect {
    Rect::from_size(390.0, 844.0).inset(20.0, 20.0).square_fit()
}

/// Touch down at the start anchor and follow the outline back around to it
fn trace_outline(shape: ShapeKind, rect: Rect, t0: u64) -> Vec<PointerSample> {
    let (anchor, _) = shape.start_anchor(rect);
    let mut samples = vec![PointerSample::moved(anchor.x, anchor.y, t0)];
    let outline = shape.perimeter_samples(rect, 240);
    let mut t = t0;
    for p in outline.iter().chain(std::iter::once(&outline[0])) {
        t += 16;
        samples.push(PointerSample::moved(p.x, p.y, t));
    }
    samples.push(PointerSample::lifted(outline[0].x, outline[0].y, t + 16));
    samples
}

#[test]
fn successful_attempt_is_recorded() {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::in_dir(dir.path());
    let rect = canvas();

    let mut session = TraceSession::new(
        ShapeKind::Ellipse,
        rect,
        TraceConfig::default(),
        RecordingSink::new(),
        0,
    );
    let outcomes: Vec<StepOutcome> = trace_outline(ShapeKind::Ellipse, rect, 500)
        .into_iter()
        .map(|s| session.handle(s))
        .collect();

    assert!(matches!(outcomes[0], StepOutcome::Started { .. }));
    assert!(matches!(outcomes.last(), Some(StepOutcome::Completed { .. })));
    assert!(session.is_completed());

    let path = session
        .finalize(&store, SCREEN, Some("P7".to_string()), &DeviceInfo::new("Pixel", "15"))
        .expect("attempt written");
    let text = fs::read_to_string(path).unwrap();
    assert!(text.starts_with(HEADER));

    let summary = text.lines().nth(1).unwrap();
    let cells: Vec<&str> = summary.split(',').collect();
    assert_eq!(cells[0], "summary");
    assert_eq!(cells[2], "P7");
    assert_eq!(&cells[4..9], &["Pixel", "15", "390", "844", "Ellipse"]);
    assert_eq!(cells[11], "true");
    assert_eq!(cells[13], "241");
}

#[test]
fn sequential_attempts_share_one_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::in_dir(dir.path());
    let rect = canvas();
    let device = DeviceInfo::host();

    let mut expected_events = 0;
    let mut expected_samples = 0;
    for shape in [ShapeKind::Triangle, ShapeKind::Star] {
        let mut session =
            TraceSession::new(shape, rect, TraceConfig::default(), RecordingSink::new(), 0);
        // Wander off before finding the outline
        session.pointer_moved(rect.center(), 0);
        session.pointer_lifted(40);
        for sample in trace_outline(shape, rect, 2_000) {
            session.handle(sample);
        }
        session.reset(10_000);
        session.pointer_moved(shape.start_anchor(rect).0, 10_100);
        session.pointer_moved(rect.center(), 10_116);
        session.back(10_200);

        expected_events += session.recorder().events().len();
        expected_samples += session.recorder().rows().len();
        assert_eq!(session.recorder().metrics().resets, 1);
        assert!(session.finalize(&store, SCREEN, None, &device).is_some());
        assert_eq!(session.finalize(&store, SCREEN, None, &device), None);
    }

    let text = fs::read_to_string(store.path()).unwrap();
    let count = |prefix: &str| text.lines().filter(|l| l.starts_with(prefix)).count();
    assert_eq!(count("row_type,"), 1);
    assert_eq!(count("summary,"), 2);
    assert_eq!(count("event,"), expected_events);
    assert_eq!(count("sample,"), expected_samples);
    // The reset dropped the first trace; one sample remains per attempt
    assert_eq!(expected_samples, 2);
}

#[test]
fn empty_attempt_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::in_dir(dir.path());
    let mut session = TraceSession::new(
        ShapeKind::Rectangle,
        canvas(),
        TraceConfig::default(),
        RecordingSink::new(),
        0,
    );
    assert_eq!(session.finalize(&store, SCREEN, None, &DeviceInfo::host()), None);
    assert!(!store.path().exists());
}
