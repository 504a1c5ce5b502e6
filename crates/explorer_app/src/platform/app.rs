use std::io::{self, BufRead, Write};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use explorer_core::{update, AppState, Msg};
use explorer_engine::{ApiClient, ClientSettings, ReqwestApiClient};
use explorer_logging::{explorer_debug, explorer_info, set_dispatch_seq};

use super::effects::EffectRunner;
use super::ui::commands::{self, Command};
use super::ui::render;
use super::{logging, persistence, Args};

const TICK_INTERVAL: Duration = Duration::from_millis(25);

/// Everything the run loop reacts to.
pub enum Inbound {
    Msg(Msg),
    Line(String),
    InputClosed,
}

pub fn run_app(args: Args) -> anyhow::Result<()> {
    logging::initialize(args.log);

    let base_dir = match args.base_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("cannot determine working directory")?,
    };
    let prefs_path = args
        .prefs
        .unwrap_or_else(persistence::default_preferences_path);
    let preferences = persistence::load_preferences(&prefs_path);

    let settings = ClientSettings {
        base_url: args.server.clone(),
        ..ClientSettings::default()
    };
    let client = ReqwestApiClient::new(settings)
        .with_context(|| format!("invalid backend url '{}'", args.server))?;
    explorer_info!("Using backend {}", client.base_url());
    let client: Arc<dyn ApiClient> = Arc::new(client);

    let (tx, rx) = mpsc::channel::<Inbound>();
    let mut runner = EffectRunner::new(client, tx.clone(), prefs_path)
        .context("failed to start engine")?;

    spawn_ticker(tx.clone());
    spawn_stdin_reader(tx);

    let mut session = Session::new();
    session.dispatch(
        Msg::Started {
            base_dir: base_dir.to_string_lossy().into_owned(),
            preferences,
        },
        &mut runner,
    );
    println!("{}", render::HELP);

    for inbound in rx {
        match inbound {
            Inbound::Msg(msg) => session.dispatch(msg, &mut runner),
            Inbound::Line(line) => {
                let view = session.state.view();
                match commands::parse(&line, &view, session.state.pending_input()) {
                    Ok(Command::Send(msgs)) => {
                        for msg in msgs {
                            session.dispatch(msg, &mut runner);
                        }
                    }
                    Ok(Command::ShowMenu(node)) => match session.state.menu_for(&node) {
                        Some(menu) => print_lines(&render::render_menu(&menu)),
                        None => println!("No such node."),
                    },
                    Ok(Command::Help) => println!("{}", render::HELP),
                    Ok(Command::Quit) => break,
                    Err(message) if message.is_empty() => {}
                    Err(message) => println!("{message}"),
                }
            }
            Inbound::InputClosed => break,
        }
    }

    runner.shutdown();
    explorer_info!("Explorer exiting after {} messages", session.seq);
    Ok(())
}

struct Session {
    state: AppState,
    seq: u64,
}

impl Session {
    fn new() -> Self {
        Self {
            state: AppState::new(),
            seq: 0,
        }
    }

    fn dispatch(&mut self, msg: Msg, runner: &mut EffectRunner) {
        self.seq += 1;
        set_dispatch_seq(self.seq);
        if !matches!(msg, Msg::Tick(_)) {
            explorer_debug!("dispatch #{}: {:?}", self.seq, msg);
        }

        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let dirty = state.consume_dirty();
        let view = dirty.then(|| state.view());
        self.state = state;

        runner.run(effects);
        if let Some(view) = view {
            print_lines(&render::render(&view));
        }
    }
}

fn print_lines(lines: &[String]) {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in lines {
        let _ = writeln!(out, "{line}");
    }
    let _ = writeln!(out);
    let _ = out.flush();
}

fn spawn_ticker(tx: mpsc::Sender<Inbound>) {
    thread::spawn(move || {
        while tx.send(Inbound::Msg(Msg::Tick(Instant::now()))).is_ok() {
            thread::sleep(TICK_INTERVAL);
        }
    });
}

fn spawn_stdin_reader(tx: mpsc::Sender<Inbound>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(Inbound::Line(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(Inbound::InputClosed);
    });
}
