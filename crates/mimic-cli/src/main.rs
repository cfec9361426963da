mod feed;
mod output;
mod script;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use mimic_config::{GameConfig, QuestSource};
use mimic_core::{EmotionLabel, Mode, QuestOutcome};
use mimic_runtime::{AnnotatedFrame, Collaborators, FrameReceiver, GameSession, Runtime, SessionError};

use crate::feed::{Feed, LiveFeed, SimCamera, SimClassifier};
use crate::output::{Format, Terminal};
use crate::script::ScriptFeed;

#[derive(Parser)]
#[command(name = "mimic", about = "Party games played with your facial expressions")]
struct Cli {
    /// Config file (TOML). Falls back to $MIMIC_CONFIG, then built-in defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one game. Without --script, type emotions on stdin, one per line
    Play {
        /// max, prompt, hold, duel or quest
        mode: Option<Mode>,

        /// Emotion to hold (hold mode)
        #[arg(long)]
        target: Option<EmotionLabel>,

        /// Fixed prompt or duel targets, comma-separated, used in order
        #[arg(long, value_delimiter = ',')]
        targets: Vec<EmotionLabel>,

        /// Seed for random target draws
        #[arg(long)]
        seed: Option<u64>,

        /// Replay a timed label script instead of reading stdin
        #[arg(long)]
        script: Option<PathBuf>,

        /// One JSON object per line on stdout
        #[arg(long)]
        json: bool,

        /// Print annotated frames as they are displayed
        #[arg(long)]
        show_frames: bool,
    },

    /// Validate and summarise the quest scenes
    Scenes {
        /// Also list every scene
        #[arg(long)]
        list: bool,
    },

    /// List playable emotion labels
    Labels,
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn load_config(cli: &Cli) -> Result<GameConfig> {
    let path = cli
        .config
        .clone()
        .or_else(|| std::env::var("MIMIC_CONFIG").ok().map(PathBuf::from));
    GameConfig::load(path.as_deref()).context("failed to load configuration")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Play {
            mode,
            target,
            targets,
            seed,
            script,
            json,
            show_frames,
        } => {
            let args = PlayArgs {
                mode: *mode,
                target: *target,
                targets: targets.clone(),
                seed: *seed,
                script: script.clone(),
                format: if *json { Format::Json } else { Format::Console },
                show_frames: *show_frames,
            };
            cmd_play(&cli, args).await
        }
        Commands::Scenes { list } => cmd_scenes(&cli, *list),
        Commands::Labels => cmd_labels(),
    }
}

struct PlayArgs {
    mode: Option<Mode>,
    target: Option<EmotionLabel>,
    targets: Vec<EmotionLabel>,
    seed: Option<u64>,
    script: Option<PathBuf>,
    format: Format,
    show_frames: bool,
}

// ---------------------------------------------------------------------------
// play
// ---------------------------------------------------------------------------

async fn cmd_play(cli: &Cli, args: PlayArgs) -> Result<()> {
    let config = load_config(cli)?;
    let quit = CancellationToken::new();

    let feed: Arc<dyn Feed> = match &args.script {
        Some(path) => Arc::new(ScriptFeed::load(path)?),
        None => LiveFeed::spawn_stdin(quit.clone()).context("failed to start stdin reader")?,
    };
    let terminal = Arc::new(Terminal::new(args.format));
    let parts = Collaborators {
        capture: Box::new(SimCamera::new(config.perception.frame_interval)),
        source: Box::new(SimClassifier::new(feed)),
        sink: terminal.clone(),
    };
    let refresh = config.perception.display_refresh;
    let mut rt = Runtime::start(parts, config.timing, config.quest)
        .context("failed to start perception")?;

    let display_stop = CancellationToken::new();
    let display = match rt.frames() {
        Some(frames) if args.show_frames => Some(spawn_display(
            frames,
            terminal.clone(),
            refresh,
            display_stop.clone(),
        )),
        _ => None,
    };

    if let Some(seed) = args.seed {
        rt.session().set_seed(seed);
    }
    if !args.targets.is_empty() {
        rt.session().script_targets(args.targets.clone());
    }

    let outcome = match start(rt.session(), args.mode, args.target).await {
        Ok(()) => {
            let finished = tokio::select! {
                outcome = rt.session().wait() => outcome,
                _ = shutdown_signal() => {
                    tracing::info!("signal received, stopping");
                    None
                }
                _ = quit.cancelled() => {
                    tracing::info!("input closed, stopping");
                    None
                }
            };
            match finished {
                Some(outcome) => Ok(Some(outcome)),
                None => Ok(rt.session().stop_active().await),
            }
        }
        Err(e) => Err(e),
    };

    rt.shutdown().await;
    display_stop.cancel();
    if let Some(display) = display {
        let _ = display.await;
    }

    if let Some(outcome) = outcome? {
        terminal.result(&outcome);
    }
    Ok(())
}

/// Start the requested mode, completing the hold target selection when one
/// is needed.
async fn start(
    session: &mut GameSession,
    mode: Option<Mode>,
    target: Option<EmotionLabel>,
) -> Result<()> {
    let needs_target = mode.is_some_and(|m| m.needs_target());
    if needs_target && target.is_none() {
        bail!("hold needs --target <emotion>");
    }
    if !needs_target && target.is_some() {
        tracing::warn!("--target only applies to hold, ignoring it");
    }

    match session.start_mode(mode).await {
        Ok(()) => {}
        Err(SessionError::InvalidSelection) => {
            bail!("no mode given, choose one of: {}", mode_keys())
        }
        Err(e) => return Err(e.into()),
    }
    if let (true, Some(target)) = (needs_target, target) {
        session.select_target(target).await?;
    }
    Ok(())
}

fn mode_keys() -> String {
    Mode::ALL
        .iter()
        .map(Mode::key)
        .collect::<Vec<_>>()
        .join(", ")
}

fn spawn_display(
    frames: FrameReceiver<AnnotatedFrame>,
    terminal: Arc<Terminal>,
    refresh: Duration,
    stop: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(refresh);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = stop.cancelled() => break,
                _ = tick.tick() => {
                    if let Some(frame) = frames.try_take() {
                        terminal.frame(&frame);
                    }
                }
            }
        }
        tracing::debug!(evicted = frames.evicted(), "display stopped");
    })
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = term.recv() => {}
                }
            }
            Err(e) => {
                tracing::warn!("cannot listen for SIGTERM: {e}");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

// ---------------------------------------------------------------------------
// scenes / labels
// ---------------------------------------------------------------------------

fn cmd_scenes(cli: &Cli, list: bool) -> Result<()> {
    let config = load_config(cli)?;
    let graph = &config.quest;

    println!("scenes:            {}", graph.len());
    println!(
        "success endings:   {}",
        graph.terminal_count(QuestOutcome::Success)
    );
    println!(
        "failure endings:   {}",
        graph.terminal_count(QuestOutcome::Failure)
    );
    println!("unreachable:       {}", graph.unreachable().len());
    match &config.quest_source {
        QuestSource::Builtin => println!("source:            built-in"),
        QuestSource::File(path) => println!("source:            {}", path.display()),
    }

    if list {
        println!();
        for scene in graph.scenes() {
            let summary = scene.text.lines().next().unwrap_or("");
            match scene.outcome {
                Some(outcome) => println!("{:>4}  [{outcome:?}] {summary}", scene.id.0),
                None => {
                    let moves = scene
                        .transitions
                        .iter()
                        .map(|(label, to)| format!("{label}->{}", to.0))
                        .collect::<Vec<_>>()
                        .join(" ");
                    println!("{:>4}  {summary}  ({moves})", scene.id.0);
                }
            }
        }
    }
    Ok(())
}

fn cmd_labels() -> Result<()> {
    for label in EmotionLabel::ALL {
        println!("{:<10} (classifier: {})", label.as_str(), label.classifier_name());
    }
    Ok(())
}
