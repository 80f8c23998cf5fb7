//! Shape Trace entry point
//!
//! Replays a seeded, jittered trace of one shape through a tracing session and
//! appends the attempt to the record store.
//!
//! Usage: `shape-trace [shape] [output-dir] [seed]`

use std::path::PathBuf;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use shape_trace::feedback::{LogSink, SharedTone};
use shape_trace::{DeviceInfo, Rect, RecordStore, ShapeKind, StepOutcome, TraceConfig, TraceSession};

/// Simulated screen, in points
const SCREEN: (u32, u32) = (390, 844);
const CANVAS_INSET: f32 = 20.0;
const SETTINGS_FILE: &str = "shape_trace_settings.json";
/// Trace samples per lap
const REPLAY_SAMPLES: usize = 240;
/// Frame interval of the replayed touch stream
const FRAME_MS: u64 = 16;
/// Maximum finger wobble around the outline
const JITTER: f32 = 6.0;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let shape = args
        .next()
        .map(|s| {
            ShapeKind::from_str(&s).unwrap_or_else(|| {
                log::warn!("Unknown shape '{}', using {}", s, ShapeKind::default().title());
                ShapeKind::default()
            })
        })
        .unwrap_or_default();
    let out_dir = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x5EED);

    log::info!("Shape Trace (native) starting: {} seed {:#x}", shape.title(), seed);

    let config = TraceConfig::load_or_default(out_dir.join(SETTINGS_FILE));
    let rect = Rect::from_size(SCREEN.0 as f32, SCREEN.1 as f32)
        .inset(CANVAS_INSET, CANVAS_INSET)
        .square_fit();

    let tone = SharedTone::default();
    let mut session = TraceSession::new(shape, rect, config, LogSink::new(tone.clone()), 0);
    let (anchor, description) = shape.start_anchor(rect);
    log::info!("Start anchor: {}", description);

    let mut rng = Pcg32::seed_from_u64(seed);
    let mut t = 250;
    // Search from the centre toward the anchor until the start locks
    let center = rect.center();
    for step in 0..=10 {
        let pos = center.lerp(anchor, step as f32 / 10.0);
        if let StepOutcome::Started { .. } = session.pointer_moved(pos, t) {
            break;
        }
        t += FRAME_MS * 8;
    }

    for p in shape.perimeter_samples(rect, REPLAY_SAMPLES) {
        t += FRAME_MS;
        let wobble = glam::Vec2::new(
            rng.random_range(-JITTER..=JITTER),
            rng.random_range(-JITTER..=JITTER),
        );
        session.tick(t);
        session.pointer_moved(p + wobble, t);
    }
    t += FRAME_MS;
    session.pointer_moved(anchor, t);
    log::debug!("Tone at lift: {:.1} Hz", tone.load());

    match session.pointer_lifted(t + FRAME_MS) {
        StepOutcome::Completed { coverage } => {
            log::info!("Completed with coverage {:.0}%", coverage * 100.0)
        }
        StepOutcome::Incomplete {
            coverage,
            stroke_length,
        } => log::info!(
            "Incomplete: coverage {:.0}%, stroke {:.0}",
            coverage * 100.0,
            stroke_length
        ),
        other => log::warn!("Unexpected lift outcome {:?}", other),
    }

    let metrics = session.recorder().metrics();
    log::info!(
        "{} samples, {} ms on path, {} ms off path, {} vertices",
        metrics.samples,
        metrics.onpath_ms,
        metrics.offpath_ms,
        metrics.vertices_hit
    );

    let store = RecordStore::in_dir(&out_dir);
    match session.finalize(&store, SCREEN, None, &DeviceInfo::host()) {
        Some(path) => log::info!("Attempt recorded in {}", path.display()),
        None => log::warn!("Attempt was not recorded"),
    }
    session.teardown();
}
