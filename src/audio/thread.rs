use std::sync::mpsc::{Receiver, RecvTimeoutError, SyncSender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStreamBuilder, Sink};

use super::excerpt::ExcerptTimer;
use super::sink::start_sink_at;
use super::types::{AudioCmd, PlaybackHandle, PlaybackInfo};

/// How often the thread wakes up to check the excerpt deadline.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Spawn the thread that owns the output stream. It reports whether the
/// output device could be opened on `ready` before processing commands.
pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    playback_info: PlaybackHandle,
    ready: SyncSender<Result<(), String>>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(s) => {
                let _ = ready.send(Ok(()));
                s
            }
            Err(e) => {
                let _ = ready.send(Err(e.to_string()));
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);

        let mut sink: Option<Sink> = None;
        let mut timer = ExcerptTimer::default();

        fn do_stop(sink: &mut Option<Sink>, timer: &mut ExcerptTimer, playback_info: &PlaybackHandle) {
            if let Some(s) = sink.take() {
                s.stop();
                if timer.is_armed() {
                    log::debug!("excerpt stopped before its deadline");
                } else {
                    log::debug!("playback stopped");
                }
            }
            timer.cancel();
            if let Ok(mut info) = playback_info.lock() {
                *info = PlaybackInfo::default();
            }
        }

        loop {
            match rx.recv_timeout(POLL_INTERVAL) {
                Ok(AudioCmd::PlayExcerpt {
                    source,
                    start,
                    length,
                }) => {
                    if let Some(old) = sink.take() {
                        old.stop();
                    }

                    let now = Instant::now();
                    sink = Some(start_sink_at(&stream, source, start));
                    timer.arm(now, length);
                    log::info!(
                        "playing {}s excerpt from {:.1}s",
                        length.as_secs(),
                        start.as_secs_f64()
                    );

                    if let Ok(mut info) = playback_info.lock() {
                        *info = PlaybackInfo {
                            playing: true,
                            offset: start,
                            length,
                            started_at: Some(now),
                        };
                    }
                }
                Ok(AudioCmd::Stop) => do_stop(&mut sink, &mut timer, &playback_info),
                Ok(AudioCmd::Quit) | Err(RecvTimeoutError::Disconnected) => {
                    do_stop(&mut sink, &mut timer, &playback_info);
                    break;
                }
                Err(RecvTimeoutError::Timeout) => {
                    let ran_out = sink.as_ref().is_some_and(Sink::empty);
                    if timer.fire(Instant::now()) || ran_out {
                        do_stop(&mut sink, &mut timer, &playback_info);
                    }
                }
            }
        }
    })
}
