mod commands;

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    AdvanceOutcome, FaceRegistry, HttpCubeServices, LocalMoveApplier, NextAction, PlaybackView,
    ServiceConfig, SolveSession,
};
use shared::domain::Face;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::commands::{Command, HELP};

#[derive(Parser, Debug)]
struct Args {
    #[arg(long, env = "CUBE_SERVER_URL", default_value = "http://127.0.0.1:5001")]
    server_url: String,
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
    /// Apply moves with the built-in facelet model instead of the server.
    #[arg(long)]
    offline_moves: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
    let args = Args::parse();

    let config = ServiceConfig::new(&args.server_url)
        .with_context(|| format!("invalid --server-url {}", args.server_url))?
        .with_timeout(Duration::from_secs(args.timeout_secs));
    let services = Arc::new(HttpCubeServices::new(&config)?);
    let mut session = SolveSession::with_http(services);
    if args.offline_moves {
        session = session.with_applier(Arc::new(LocalMoveApplier));
    }
    info!(
        server = %config.base_url,
        offline_moves = args.offline_moves,
        "desktop client ready"
    );

    println!("cube companion, talking to {}", config.base_url);
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print_prompt(&session.view());
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }
        if let Err(err) = run(&mut session, command).await {
            warn!(%err, "command failed");
            println!("error: {err:#}");
        }
    }
    Ok(())
}

async fn run(session: &mut SolveSession, command: Command) -> Result<()> {
    match command {
        Command::Scan { face, image } => {
            let bytes = tokio::fs::read(&image)
                .await
                .with_context(|| format!("cannot read {}", image.display()))?;
            let grid = session.scan_face(face, &bytes).await?;
            println!("{face}: {grid}");
        }
        Command::Set { face, grid } => {
            session.record_face(face, grid);
            println!("{face}: {grid}");
        }
        Command::Clear { face } => session.clear_face(face),
        Command::ClearAll => session.clear_all(),
        Command::Faces => print_faces(session.registry()),
        Command::Solve => {
            let solution = session.solve().await?;
            if solution.is_empty() {
                println!("already solved");
            } else {
                println!("solution: {}", solution.display);
            }
        }
        Command::Next => match session.advance().await? {
            AdvanceOutcome::Advanced {
                performed,
                completed_move,
                ..
            } => {
                print!("did {performed}");
                if let Some(mv) = completed_move {
                    print!(" (finished {mv})");
                }
                println!();
            }
            AdvanceOutcome::NothingToDo => println!("nothing to do; `solve` first"),
        },
        Command::Show => print_view(&session.view()),
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
    Ok(())
}

fn print_prompt(view: &PlaybackView) {
    match view.next_action {
        Some(NextAction::Press(mv)) => println!("> press {mv}"),
        Some(NextAction::TurnBack) => println!("> turn the cube to show the back face"),
        Some(NextAction::Solved) => println!("> solved"),
        None => println!("> scan all six faces, then `solve`"),
    }
}

fn print_faces(registry: &FaceRegistry) {
    for face in Face::ALL {
        let rendered = registry
            .slot(face)
            .map(|slot| slot.render())
            .unwrap_or_else(|| "-".to_string());
        println!("  {face}: {rendered}");
    }
}

fn print_view(view: &PlaybackView) {
    println!("state: {:?}", view.lifecycle);
    if let Some(text) = &view.solution_text {
        println!("solution: {text}");
    }
    if let Some(progress) = view.progress {
        println!(
            "action {}/{}, move {}/{}, presses left {}",
            progress.current_move_index(),
            view.total_actions,
            progress.logical_move_index(),
            view.total_moves,
            progress.presses_remaining()
        );
    }
    if view.mirrored_state.as_ref().is_some_and(|state| state.is_solved()) {
        println!("cube model is solved");
    }
}
