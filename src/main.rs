//! Flicks headless runner
//!
//! Plays sessions with the auto-player against a simulated millisecond
//! clock, prints each result and records it in the session history.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use glam::Vec2;

use flicks::app::{Game, Keys};
use flicks::audio::LogSoundPlayer;
use flicks::bot::AutoPlayer;
use flicks::consts::DEFAULT_FPS;
use flicks::history::{CsvHistoryStore, HistoryStats, format_age};
use flicks::input::RawInput;
use flicks::renderer::NullRenderer;
use flicks::settings::{JsonSettingsStore, SettingsStore};
use flicks::sim::{GamePhase, GameResult, SeededRng, SessionEvent};
use flicks::{Preset, Settings};

#[derive(Debug, Parser)]
#[command(name = "flicks", about = "Flick aim trainer (headless auto-play)")]
struct Args {
    /// Drill preset, e.g. BB250ms, RTDA225ms, PRflick
    #[arg(short, long)]
    preset: Option<String>,

    /// Number of sessions to play
    #[arg(short, long, default_value_t = 1)]
    sessions: u32,

    /// RNG seed (defaults to the current time)
    #[arg(long)]
    seed: Option<u64>,

    /// Simulated frames per second
    #[arg(long, default_value_t = DEFAULT_FPS)]
    fps: u32,

    /// Directory holding settings.json and game_summaries.csv
    #[arg(long, default_value = "res")]
    data_dir: PathBuf,

    /// Fastest simulated reaction
    #[arg(long, default_value_t = 180)]
    reaction_min_ms: u32,

    /// Slowest simulated reaction
    #[arg(long, default_value_t = 320)]
    reaction_max_ms: u32,

    /// Chance (0-1) that the auto-player misses a target
    #[arg(long, default_value_t = 0.1)]
    miss_chance: f32,

    /// Request an early finish this many ms into each session
    #[arg(long)]
    force_finish_after: Option<u64>,

    /// OS pointer speed setting to emulate (1-20, 10 is unscaled)
    #[arg(long, default_value_t = 10)]
    mouse_speed: i32,

    #[arg(long, default_value_t = 1920.0)]
    width: f32,

    #[arg(long, default_value_t = 1080.0)]
    height: f32,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let settings_store = JsonSettingsStore::in_dir(&args.data_dir);
    let mut settings = Settings::load_or_default(&settings_store);
    if let Some(name) = &args.preset {
        let preset = Preset::from_str(name).ok_or_else(|| {
            let known: Vec<_> = Preset::ALL.iter().map(Preset::as_str).collect();
            format!("unknown preset '{name}' (known: {})", known.join(", "))
        })?;
        settings.apply_preset(preset);
        log::info!("Using preset {}", preset.as_str());
    }

    let seed = args
        .seed
        .unwrap_or_else(|| chrono::Utc::now().timestamp_millis().unsigned_abs());
    log::info!("Seed {seed}");

    let mut game = Game::new(
        settings,
        Vec2::new(args.width, args.height),
        SeededRng::new(seed),
        LogSoundPlayer::new(1.0),
        CsvHistoryStore::in_dir(&args.data_dir),
    );
    game.set_mouse_speed(args.mouse_speed);
    let mut bot = AutoPlayer::new(
        seed.wrapping_add(1),
        args.reaction_min_ms,
        args.reaction_max_ms,
        args.miss_chance,
    )
    .with_speed_multiplier(game.speed_multiplier());
    let mut renderer = NullRenderer::default();

    let frame_ms = u64::from((1000 / args.fps.max(1)).max(1));
    let mut now = 0u64;

    for n in 1..=args.sessions {
        let deadline = now + session_budget_ms(game.settings());
        let mut result = None;

        while result.is_none() && now < deadline {
            now += frame_ms;
            bot.observe(now, game.session(), game.layout(), game.cursor_pos());
            let session = game.session();
            let keys = Keys {
                force_finish: args.force_finish_after.is_some_and(|after| {
                    session.phase == GamePhase::Running && session.elapsed_ms(now) >= after
                }),
                ..Default::default()
            };

            for event in game.frame(now, &mut bot, keys) {
                if let SessionEvent::Finished(r) = event {
                    result = Some(r);
                }
            }
            game.present(&mut renderer);
        }

        match result {
            Some(result) => {
                print_result(n, &result);
                if let Some(stats) = game.last_result_stats() {
                    print_stats(&stats, result.settings.end_by_spawn_count);
                }
            }
            None => log::warn!("Session {n} did not finish in time, abandoning"),
        }

        let reset = Keys {
            reset: true,
            ..Default::default()
        };
        game.frame(now, &mut RawInput::default(), reset);
    }

    if let Some(last) = game.history().entries().last() {
        println!(
            "Last recorded session: {}",
            format_age(last.timestamp, chrono::Utc::now().timestamp())
        );
    }
    log::info!("Presented {} frames", renderer.frames);

    settings_store.save(game.settings())?;
    Ok(())
}

/// Upper bound on how long one auto-played session can take
fn session_budget_ms(settings: &Settings) -> u64 {
    let longest_delay = settings.max_spawn_delay_ms.max(settings.min_spawn_delay_ms);
    let per_target = u64::from(settings.target_lifetime_ms) + u64::from(longest_delay);
    let body = if settings.end_by_spawn_count {
        u64::from(settings.max_spawn_count) * per_target
    } else {
        u64::from(settings.game_time_sec) * 1000 + per_target
    };
    body + 10_000
}

fn print_result(n: u32, result: &GameResult) {
    println!("== Session {n}{}", if result.forced { " (forced)" } else { "" });
    println!("  hits        {}", result.hits);
    println!("  attempts    {}", result.attempts);
    println!("  accuracy    {:.1}%", result.accuracy);
    println!("  avg react   {:.1} ms", result.average_reaction_time);
    if let (Some(fast), Some(slow)) = (result.fastest_reaction(), result.slowest_reaction()) {
        println!("  react range {fast}-{slow} ms");
    }
    println!("  score       {:.1}", result.score);
    println!("  duration    {} s", result.elapsed_secs());
}

fn print_stats(stats: &HistoryStats, end_by_spawn_count: bool) {
    let best = if end_by_spawn_count { "min" } else { "max" };
    println!(
        "  history     {} games, {best} {:.1}, avg {:.1}",
        stats.games, stats.best_score, stats.avg_score
    );
    if let Some(avg) = stats.avg_reaction {
        println!("  history rt  avg {avg:.1} ms");
    }
}
