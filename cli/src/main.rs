use anyhow::Result;
use clap::Parser;
use std::io::{self, BufRead};
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::Duration;
use sweeper_core::{GameClock, GameSession, Ticker};

mod command;
mod render;

use command::{Command, Flow, HELP};

#[derive(Parser, Debug)]
#[command(version, about = "Terminal minesweeper on the classic 20x20 board", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// How often the timer display refreshes, in milliseconds
    #[arg(long, default_value_t = 500)]
    tick_ms: u64,
}

enum Event {
    Line(String),
    Tick(u32),
    InputClosed,
}

fn spawn_input(events: Sender<Event>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if events.send(Event::Line(line)).is_err() {
                return;
            }
        }
        let _ = events.send(Event::InputClosed);
    });
}

fn spawn_ticker(clock: GameClock, period: Duration, events: &Sender<Event>) -> Ticker {
    let events = events.clone();
    Ticker::spawn(clock, period, move |secs| events.send(Event::Tick(secs)).is_ok())
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let seed = args.seed.unwrap_or_else(rand::random);
    log::debug!("seed: {}", seed);
    let period = Duration::from_millis(args.tick_ms.max(1));

    let mut session = GameSession::classic(seed)?;
    let (events_tx, events) = mpsc::channel();
    spawn_input(events_tx.clone());
    let mut ticker = spawn_ticker(session.clock(), period, &events_tx);
    let mut prev_time = 0;

    print!("{}", render::board(&session.view()));
    println!("type `help` for commands");

    while let Ok(event) = events.recv() {
        match event {
            Event::Line(line) => match Command::parse(&line) {
                Ok(None) => {}
                Ok(Some(command)) => match command.apply(&mut session) {
                    Flow::Redraw => print!("{}", render::board(&session.view())),
                    Flow::Dump => println!("{}", serde_json::to_string_pretty(&session.view())?),
                    Flow::Help => println!("{}", HELP),
                    Flow::Quiet => {}
                    Flow::Quit => break,
                },
                Err(err) => println!("{:#}", err),
            },
            Event::Tick(secs) => {
                if secs != prev_time {
                    prev_time = secs;
                    println!("{}", render::status_line(&session.view()));
                }
            }
            Event::InputClosed => break,
        }

        if !ticker.watches(&session.clock()) {
            log::trace!("New game, replacing ticker");
            prev_time = 0;
            ticker = spawn_ticker(session.clock(), period, &events_tx);
        }
    }

    drop(ticker);
    log::debug!("Finished with {:?}", session.outcome());
    Ok(())
}
