mod ui;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use flanker::{
    app_dirs::AppDirs,
    block::{BlockRunner, Durations},
    conditions,
    config::{ConfigStore, FileConfigStore},
    instructions::InstructionDeck,
    metadata::{prompt_session_info, MetadataError},
    output::{finalize_session, session_paths, CsvSink, ResultSink, SessionArtifact},
    runtime::{CrosstermEventSource, EventSource, FixedTicker, Runner, SessionEvent},
    session::SessionInfo,
    summary::{summarize, ConditionSummary},
    trial::{TrialResult, TrialSpec},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin, stdout},
    time::Instant,
};

#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Instructions,
    Trials,
    Debrief,
}

/// Everything the render pass needs to draw one frame.
pub struct App {
    pub state: AppState,
    pub info: SessionInfo,
    pub deck: InstructionDeck,
    pub block: Option<BlockRunner>,
    pub results: Vec<TrialResult>,
    pub summary: Vec<ConditionSummary>,
}

impl App {
    pub fn new(info: SessionInfo) -> Self {
        Self {
            state: AppState::Instructions,
            info,
            deck: InstructionDeck::new(),
            block: None,
            results: Vec::new(),
            summary: Vec::new(),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    // Blocking metadata prompt; no window or file exists yet, so
    // cancellation here leaves no trace.
    let info = match prompt_session_info(stdin().lock(), stdout()) {
        Ok(info) => info,
        Err(MetadataError::Cancelled) => {
            eprintln!("cancelled");
            return Ok(());
        }
        Err(e) => return Err(Box::new(e)),
    };

    let config = FileConfigStore::new().load();
    let durations = Durations {
        fixation_ms: config.fixation_ms as f64,
        stimulus_ms: config.stimulus_ms as f64,
    };

    // A block cannot run without its trial list; a bad table is fatal
    // before the display opens.
    let mut blocks: Vec<Vec<TrialSpec>> = Vec::new();
    for name in &config.blocks {
        blocks.push(conditions::load_block(AppDirs::block_path(name))?);
    }

    let data_dir = AppDirs::data_dir();
    let (csv_path, json_path) = session_paths(&data_dir, &info.stem());
    let mut sink = CsvSink::create(&csv_path)?;

    enable_raw_mode()?;
    let mut out = io::stdout();
    execute!(out, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(out);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(info.clone());
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    let session = start_tui(
        &mut terminal,
        &mut app,
        &runner,
        blocks,
        durations,
        &mut sink,
    );

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Flush whatever was collected before propagating a loop failure; an
    // errored session counts as aborted in the artifact.
    let aborted = session.as_ref().copied().unwrap_or(true);
    let artifact = SessionArtifact::new(info, config, app.results.clone(), aborted);
    let finalized = finalize_session(&mut sink, &artifact, &json_path);
    let aborted = session?;
    finalized?;

    println!(
        "{} trial{} saved to {}",
        app.results.len(),
        if app.results.len() == 1 { "" } else { "s" },
        csv_path.display()
    );
    if aborted {
        println!("session aborted by escape key");
    }

    Ok(())
}

/// Drives the session: instruction walk, then the blocks in order, then the
/// debrief. Returns whether the participant aborted.
fn start_tui<B: Backend, E: EventSource>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    events: &Runner<E, FixedTicker>,
    blocks: Vec<Vec<TrialSpec>>,
    durations: Durations,
    sink: &mut dyn ResultSink,
) -> Result<bool, Box<dyn Error>> {
    let clock_zero = Instant::now();
    let now_ms = || clock_zero.elapsed().as_secs_f64() * 1000.0;

    let mut blocks = blocks.into_iter();
    let mut block_number = 0usize;
    let mut aborted = false;

    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        match events.step() {
            SessionEvent::Tick => {
                if app.state == AppState::Trials {
                    let now = now_ms();
                    if let Some(runner) = app.block.as_mut() {
                        if let Some(result) = runner.tick(now) {
                            sink.append(&result)?;
                            app.results.push(result);
                        }
                        if runner.is_finished() {
                            if runner.is_aborted() {
                                aborted = true;
                                break;
                            }
                            match blocks.next() {
                                Some(trials) => {
                                    block_number += 1;
                                    let mut next =
                                        BlockRunner::new(block_number, trials, durations);
                                    events.drain();
                                    next.start(now_ms());
                                    app.block = Some(next);
                                }
                                None => {
                                    app.summary = summarize(&app.results);
                                    app.state = AppState::Debrief;
                                }
                            }
                        }
                    }
                }
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            }
            SessionEvent::Resize => {
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            }
            SessionEvent::Abort => {
                if let Some(runner) = app.block.as_mut() {
                    runner.abort();
                }
                // Debrief has already flushed everything; leaving it is
                // a normal exit, not an abort.
                aborted = app.state != AppState::Debrief;
                break;
            }
            SessionEvent::Advance => {
                match app.state {
                    AppState::Instructions => {
                        if !app.deck.advance() {
                            match blocks.next() {
                                Some(trials) => {
                                    block_number += 1;
                                    let mut runner =
                                        BlockRunner::new(block_number, trials, durations);
                                    events.drain();
                                    runner.start(now_ms());
                                    app.block = Some(runner);
                                    app.state = AppState::Trials;
                                }
                                None => {
                                    app.state = AppState::Debrief;
                                }
                            }
                        }
                    }
                    // Space has no role inside a trial window.
                    AppState::Trials => {}
                    AppState::Debrief => break,
                }
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            }
            SessionEvent::Respond(direction) => {
                if app.state == AppState::Trials {
                    if let Some(runner) = app.block.as_mut() {
                        runner.key(direction, now_ms());
                    }
                }
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            }
        }
    }

    Ok(aborted)
}
