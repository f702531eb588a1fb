use clap::Subcommand;
use nextup_core::{AlertAudio, AlertClock, BellPlayer, Board, SilentPlayer, SoundPlayer};
use tokio_util::sync::CancellationToken;

use super::{resolve_now, runtime, Context};
use crate::render::{board_text, TerminalSink};

#[derive(Subcommand)]
pub enum BoardAction {
    /// Print the board once
    Show {
        /// Evaluate at this local time ("YYYY-MM-DD HH:MM") instead of now
        #[arg(long)]
        at: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Keep the board live until Ctrl-C
    Watch {
        /// Print one JSON board per tick instead of redrawing
        #[arg(long)]
        json: bool,
    },
}

pub fn run(ctx: &Context, action: BoardAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        BoardAction::Show { at, json } => {
            let now = resolve_now(at.as_deref())?;
            let data = ctx.load()?;
            let board = Board::compute(&data, now, &ctx.config.resolver());
            if json {
                println!("{}", serde_json::to_string_pretty(&board)?);
            } else {
                print!("{}", board_text(&board));
            }
        }
        BoardAction::Watch { json } => watch(ctx, json)?,
    }
    Ok(())
}

fn watch(ctx: &Context, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let source = ctx.source()?;
    let player: Box<dyn SoundPlayer> = if ctx.config.audio.enabled {
        Box::new(BellPlayer)
    } else {
        Box::new(SilentPlayer)
    };
    let audio = AlertAudio::new(player, ctx.config.audio.repeat_secs);

    let clock = AlertClock::new(source, TerminalSink::new(json), audio)
        .with_resolver(ctx.config.resolver())
        .with_timing(ctx.config.tick_interval(), ctx.config.refresh_interval());

    runtime()?.block_on(async move {
        let cancel = CancellationToken::new();
        let on_signal = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                on_signal.cancel();
            }
        });
        clock.run(cancel).await;
    });
    Ok(())
}
