//! `voice-concierge` binary.
//!
//! ```text
//! voice-concierge [--file <wav>] [--realtime] [--json] [--config <toml>]
//! ```
//!
//! # Startup sequence
//!
//! 1. Initialise logging (`RUST_LOG`, default `info`).
//! 2. Load [`AppConfig`] and the user lexicon.
//! 3. Load the Whisper model and wrap it in a streaming recognizer.
//! 4. Build a tokio runtime and spawn the [`SessionRunner`].
//! 5. Microphone mode: hotkey toggles the session, Ctrl-C exits.
//!    File mode: one session over the WAV file, exit when it ends.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tokio::sync::mpsc;
use voice_concierge::{
    asr::{StreamingConfig, StreamingRecognizer, TranscribeParams, WhisperEngine},
    audio::{MicrophoneFactory, SourceFactory, WavFileFactory},
    config::{AppConfig, AppPaths},
    dialogue::{EntityExtractor, ReplyEvent, Speaker, Transcript},
    hotkey::{parse_key, ToggleListener},
    lexicon::{Lexicon, UserLexicon},
    session::{SessionCommand, SessionController, SessionRunner, SessionUpdate},
};

const USAGE: &str = "usage: voice-concierge [--file <wav>] [--realtime] [--json] [--config <toml>]";

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    file: Option<PathBuf>,
    realtime: bool,
    json: bool,
    config: Option<PathBuf>,
    help: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliArgs> {
    let mut out = CliArgs::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--file" | "-f" => {
                out.file = Some(args.next().context("--file needs a path")?.into());
            }
            "--config" | "-c" => {
                out.config = Some(args.next().context("--config needs a path")?.into());
            }
            "--realtime" => out.realtime = true,
            "--json" => out.json = true,
            "--help" | "-h" => out.help = true,
            other => bail!("unknown argument {other:?}\n{USAGE}"),
        }
    }
    if out.realtime && out.file.is_none() {
        bail!("--realtime only applies to --file");
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Console presenter
// ---------------------------------------------------------------------------

/// User lines flush left, system lines flush right.
struct ConsolePresenter {
    width: usize,
}

impl ConsolePresenter {
    fn render(&self, event: &ReplyEvent) -> String {
        match event.speaker {
            Speaker::User => format!("用户：{}", event.text),
            Speaker::System => {
                let pad = self.width.saturating_sub(display_width(&event.text));
                format!("{}{}", " ".repeat(pad), event.text)
            }
        }
    }
}

/// Terminal columns, counting non-ASCII characters as double width.
fn display_width(text: &str) -> usize {
    text.chars().map(|c| if c.is_ascii() { 1 } else { 2 }).sum()
}

fn print_json(transcript: &Transcript) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(transcript.events())?);
    Ok(())
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args(std::env::args().skip(1))?;
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }

    let paths = AppPaths::new();
    let config = match &args.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };

    let user = UserLexicon::load_from(&paths.user_lexicon_file).unwrap_or_else(|e| {
        log::warn!("lexicon: ignoring user lexicon: {e}");
        UserLexicon::default()
    });
    let lexicon = Arc::new(Lexicon::with_user(user));
    log::info!("lexicon: {} floor phrases", lexicon.len());

    let model_path = paths.model_file(&config.stt.model);
    let engine = WhisperEngine::load(&model_path, TranscribeParams::from_config(&config.stt))
        .with_context(|| format!("loading speech model {}", model_path.display()))?;
    let recognizer = StreamingRecognizer::new(engine, StreamingConfig::from_app(&config));

    let factory: Arc<dyn SourceFactory> = match &args.file {
        Some(path) => Arc::new(WavFileFactory::new(
            path,
            config.audio.buffer_ms,
            args.realtime,
        )),
        None => Arc::new(MicrophoneFactory::new(
            config.audio.device.clone(),
            config.audio.buffer_ms,
        )),
    };

    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("creating tokio runtime")?;

    let (cmd_tx, cmd_rx) = mpsc::channel(8);
    let (update_tx, update_rx) = mpsc::channel(config.session.channel_capacity);
    let runner = SessionRunner::new(
        SessionController::new(EntityExtractor::new(lexicon)),
        factory,
        Box::new(recognizer),
        update_tx,
        config.session.channel_capacity,
    );

    rt.block_on(async move {
        let runner_task = tokio::spawn(runner.run(cmd_rx));
        let presenter = ConsolePresenter { width: 60 };

        let result = if args.file.is_some() {
            run_file(&presenter, args.json, cmd_tx, update_rx).await
        } else {
            run_microphone(&presenter, args.json, &config, cmd_tx, update_rx).await
        };

        if !runner_task.is_finished() {
            runner_task.abort();
        }
        result
    })
}

/// One session over the file; returns once it stops.
async fn run_file(
    presenter: &ConsolePresenter,
    json: bool,
    commands: mpsc::Sender<SessionCommand>,
    mut updates: mpsc::Receiver<SessionUpdate>,
) -> Result<()> {
    commands.send(SessionCommand::Start).await?;

    while let Some(update) = updates.recv().await {
        match update {
            SessionUpdate::Started { .. } => {}
            SessionUpdate::Reply(event) if !json => println!("{}", presenter.render(&event)),
            SessionUpdate::Reply(_) => {}
            SessionUpdate::Stopped { transcript, .. } => {
                if json {
                    print_json(&transcript)?;
                }
                return Ok(());
            }
            SessionUpdate::Error(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// Hotkey-driven sessions until Ctrl-C.
async fn run_microphone(
    presenter: &ConsolePresenter,
    json: bool,
    config: &AppConfig,
    commands: mpsc::Sender<SessionCommand>,
    mut updates: mpsc::Receiver<SessionUpdate>,
) -> Result<()> {
    let _listener = match parse_key(&config.hotkey.toggle_session_key) {
        Some(key) => {
            let listener = ToggleListener::start(key, commands.clone())
                .context("starting hotkey listener")?;
            log::info!("press {} to start / stop listening", config.hotkey.toggle_session_key);
            Some(listener)
        }
        None => {
            log::warn!(
                "hotkey: unknown key {:?}, toggling disabled",
                config.hotkey.toggle_session_key
            );
            None
        }
    };

    if config.session.auto_start {
        commands.send(SessionCommand::Start).await?;
    }

    let mut active = false;
    loop {
        tokio::select! {
            update = updates.recv() => {
                let Some(update) = update else { return Ok(()) };
                match update {
                    SessionUpdate::Started { session } => {
                        active = true;
                        eprintln!("-- session {session}: listening --");
                    }
                    SessionUpdate::Reply(event) => println!("{}", presenter.render(&event)),
                    SessionUpdate::Stopped { session, transcript } => {
                        active = false;
                        eprintln!("-- session {session}: stopped --");
                        if json {
                            print_json(&transcript)?;
                        }
                    }
                    SessionUpdate::Error(e) => log::error!("session: {e}"),
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    if active {
        commands.send(SessionCommand::Stop).await?;
        let deadline = tokio::time::sleep(Duration::from_secs(2));
        tokio::pin!(deadline);
        loop {
            tokio::select! {
                update = updates.recv() => match update {
                    Some(SessionUpdate::Stopped { transcript, .. }) => {
                        if json {
                            print_json(&transcript)?;
                        }
                        break;
                    }
                    Some(_) => {}
                    None => break,
                },
                _ = &mut deadline => {
                    log::warn!("session: no stop confirmation, exiting anyway");
                    break;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<CliArgs> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parses_file_mode() {
        let parsed = args(&["--file", "order.wav", "--realtime", "--json"]).unwrap();
        assert_eq!(parsed.file, Some(PathBuf::from("order.wav")));
        assert!(parsed.realtime && parsed.json);
        assert!(parsed.config.is_none());
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(args(&["--file"]).is_err());
        assert!(args(&["--realtime"]).is_err());
        assert!(args(&["--bogus"]).is_err());
    }

    #[test]
    fn no_arguments_is_microphone_mode() {
        assert_eq!(args(&[]).unwrap(), CliArgs::default());
    }

    #[test]
    fn user_left_system_right() {
        let p = ConsolePresenter { width: 20 };
        assert_eq!(p.render(&ReplyEvent::user("三楼")), "用户：三楼");
        let line = p.render(&ReplyEvent::system("您要去第 3 楼"));
        assert!(line.starts_with(' '));
        assert_eq!(display_width(&line), 20);
    }
}
