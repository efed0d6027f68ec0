//! Play command handler

use anyhow::{bail, Context, Result};
use tracing::info;

use ytloop::backend::{BackendKind, MpvPlayer, SimulatedPlayer, VideoPlayer};
use ytloop::cli::PlayArgs;
use ytloop::player::{run_looper, LoopSession, SessionOptions};
use ytloop::video::{resolve_input, LoopLink, VideoId, INVALID_INPUT_MESSAGE};
use ytloop::{current_theme, Config};

/// Open the looper and print the final loop link.
#[cfg(not(tarpaulin_include))]
pub fn handle(args: PlayArgs) -> Result<()> {
    let config = Config::load()?;

    let default_video = VideoId::parse(&config.playback.default_video)
        .context("Invalid playback.default_video in config")?;

    let mut link = match args.input.as_deref() {
        Some(input) => match resolve_input(input) {
            Ok(link) => link,
            Err(_) => bail!(INVALID_INPUT_MESSAGE),
        },
        None => LoopLink::default(),
    };
    if args.start.is_some() {
        link.start = args.start;
    }
    if args.end.is_some() {
        link.end = args.end;
    }

    let mut options = SessionOptions::from_config(&config);
    if let Some(speed) = args.speed {
        options.speed = speed;
    }

    if !atty::is(atty::Stream::Stdout) || !atty::is(atty::Stream::Stdin) {
        bail!("ytloop play needs an interactive terminal; use `ytloop link` to print a loop link");
    }

    let backend = args.backend.unwrap_or(config.player.backend);
    info!("backend {}", backend.name());

    let outcome = match backend {
        BackendKind::Mpv => {
            let player = MpvPlayer::spawn(&config.player.mpv_config())
                .context("Failed to start mpv (is it installed and on PATH?)")?;
            run(player, link, default_video, options)?
        }
        BackendKind::Simulated => {
            let player = SimulatedPlayer::new(config.player.simulated_duration_secs);
            run(player, link, default_video, options)?
        }
    };

    let theme = current_theme();
    println!("{}", theme.accent_text(&outcome));
    Ok(())
}

fn run<P: VideoPlayer>(
    player: P,
    link: LoopLink,
    default_video: VideoId,
    options: SessionOptions,
) -> Result<String> {
    let mut session = LoopSession::new(player, link, default_video, options);
    let outcome = run_looper(&mut session)?;
    Ok(outcome.link_url)
}
