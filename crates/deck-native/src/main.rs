use clap::Parser;
use deck_core::{
    dial_marks, format_clock, meter_segments, minor_marks, PlaybackSession, SessionConfig,
    DEFAULT_DURATION_MINUTES, MAX_TIME_MINUTES, METER_SEGMENTS,
};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

mod event_loop;
mod synth;

use event_loop::{Due, LoopScheduler, TimerQueue};
use synth::SyntheticTransport;

/// Run the cassette timer deck headless: play, count down, meter.
#[derive(Parser, Debug)]
#[command(name = "deck-native", version)]
struct Args {
    /// Countdown length in minutes (0-90)
    #[arg(long, default_value_t = DEFAULT_DURATION_MINUTES)]
    minutes: f64,

    /// Real-time milliseconds between countdown ticks; each tick still removes one second
    #[arg(long, default_value_t = 1000)]
    tick_ms: u64,

    /// Milliseconds between meter frames
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,

    /// Simulated track length in seconds; the deck stops when it runs out
    #[arg(long)]
    track_secs: Option<f64>,

    /// Seed for the synthetic spectrum
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

type NativeDeck = PlaybackSession<SyntheticTransport, LoopScheduler>;

fn meter_bar(level: f32) -> String {
    let lit = meter_segments(level, METER_SEGMENTS);
    format!("{}{}", "#".repeat(lit), ".".repeat(METER_SEGMENTS - lit))
}

fn report(deck: &NativeDeck) {
    log::info!(
        "[deck] {} [{}] {:?}",
        format_clock(deck.remaining_minutes()),
        meter_bar(deck.level()),
        deck.play_state()
    );
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if !(0.0..=MAX_TIME_MINUTES).contains(&args.minutes) {
        log::warn!(
            "--minutes {} outside 0-{}, clamping",
            args.minutes,
            MAX_TIME_MINUTES
        );
    }
    let track = match args.track_secs {
        Some(s) if s.is_finite() && s > 0.0 => Some(Duration::from_secs_f64(s)),
        Some(s) => anyhow::bail!("--track-secs must be positive, got {}", s),
        None => None,
    };

    let queue = Rc::new(RefCell::new(TimerQueue::new(Duration::from_millis(
        args.frame_ms.max(1),
    ))));
    let config = SessionConfig {
        initial_minutes: args.minutes,
        countdown_interval: Duration::from_millis(args.tick_ms.max(1)),
        ..SessionConfig::default()
    };
    let mut deck = PlaybackSession::new(
        SyntheticTransport::new(track, args.seed),
        LoopScheduler::new(queue.clone()),
        &config,
    );

    log::info!(
        "[dial] {} min set, scale {:?} minor {:?}",
        deck.configured_minutes(),
        dial_marks(),
        minor_marks()
    );
    deck.play()?;
    if !deck.is_playing() {
        log::warn!("nothing to play: duration is zero");
        return Ok(());
    }
    report(&deck);
    let started = Instant::now();

    loop {
        let now = Instant::now();
        if deck.audio().take_ended(now) {
            deck.on_audio_ended();
            report(&deck);
        }
        let due = queue.borrow_mut().pop_due(now);
        match due {
            Some(Due::Tick) => {
                deck.on_countdown_tick();
                report(&deck);
            }
            Some(Due::Frame) => deck.on_frame(),
            None => {
                let next = queue.borrow().next_deadline();
                match next {
                    Some(at) => std::thread::sleep(at.saturating_duration_since(now)),
                    None => break,
                }
            }
        }
    }

    deck.teardown();
    log::info!(
        "finished after {:.1}s remaining={}",
        started.elapsed().as_secs_f64(),
        format_clock(deck.remaining_minutes())
    );
    Ok(())
}
