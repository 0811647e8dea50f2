use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::excerpt::{ExcerptTimer, excerpt_start};
use super::sink::{open_source, read_duration};
use super::types::PlaybackInfo;
use crate::error::QuizError;

const THIRTY: Duration = Duration::from_secs(30);

#[test]
fn excerpt_start_stays_within_bounds() {
    let mut rng = StdRng::seed_from_u64(42);
    for total_secs in [31u64, 45, 90, 215, 3600] {
        let total = Duration::from_secs(total_secs);
        let max = total - THIRTY;
        for _ in 0..200 {
            let start = excerpt_start(total, THIRTY, &mut rng);
            assert!(start <= max, "{start:?} > {max:?}");
        }
    }
}

#[test]
fn excerpt_start_is_zero_for_short_files() {
    let mut rng = StdRng::seed_from_u64(1);
    for total_secs in [0u64, 1, 29, 30] {
        let start = excerpt_start(Duration::from_secs(total_secs), THIRTY, &mut rng);
        assert_eq!(start, Duration::ZERO);
    }
}

#[test]
fn excerpt_start_uses_the_whole_range() {
    let mut rng = StdRng::seed_from_u64(8);
    let total = Duration::from_secs(130);
    let starts: Vec<Duration> = (0..500)
        .map(|_| excerpt_start(total, THIRTY, &mut rng))
        .collect();
    assert!(starts.iter().any(|s| *s < Duration::from_secs(20)));
    assert!(starts.iter().any(|s| *s > Duration::from_secs(80)));
}

#[test]
fn timer_fires_once_after_deadline() {
    let t0 = Instant::now();
    let mut timer = ExcerptTimer::default();
    assert!(!timer.fire(t0));

    timer.arm(t0, THIRTY);
    assert!(timer.is_armed());
    assert!(!timer.fire(t0 + Duration::from_secs(29)));
    assert!(timer.fire(t0 + THIRTY));
    assert!(!timer.fire(t0 + Duration::from_secs(31)));
    assert!(!timer.is_armed());
}

#[test]
fn rearming_replaces_a_stale_deadline() {
    let t0 = Instant::now();
    let mut timer = ExcerptTimer::default();
    timer.arm(t0, THIRTY);

    // A new excerpt starts 20s in; the first deadline must not stop it.
    let t1 = t0 + Duration::from_secs(20);
    timer.arm(t1, THIRTY);
    assert!(!timer.fire(t0 + THIRTY));
    assert!(timer.fire(t1 + THIRTY));
}

#[test]
fn cancelled_timer_never_fires() {
    let t0 = Instant::now();
    let mut timer = ExcerptTimer::default();
    timer.arm(t0, THIRTY);
    timer.cancel();
    assert!(!timer.fire(t0 + Duration::from_secs(3600)));
}

#[test]
fn playback_elapsed_is_capped_and_zero_when_idle() {
    let t0 = Instant::now();
    let info = PlaybackInfo {
        playing: true,
        offset: Duration::from_secs(12),
        length: THIRTY,
        started_at: Some(t0),
    };
    assert_eq!(info.elapsed(t0 + Duration::from_secs(10)), Duration::from_secs(10));
    assert_eq!(info.elapsed(t0 + Duration::from_secs(45)), THIRTY);

    let idle = PlaybackInfo::default();
    assert_eq!(idle.elapsed(t0 + Duration::from_secs(10)), Duration::ZERO);
}

#[test]
fn missing_or_garbage_files_are_playback_errors() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.mp3");
    assert!(matches!(
        read_duration(&missing),
        Err(QuizError::Playback { .. })
    ));
    assert!(matches!(open_source(&missing), Err(QuizError::Playback { .. })));

    let garbage = dir.path().join("garbage.mp3");
    std::fs::write(&garbage, b"definitely not audio").unwrap();
    assert!(matches!(open_source(&garbage), Err(QuizError::Playback { .. })));
}
