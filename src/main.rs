use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use taskflow::{
    task::{HttpTaskClient, TaskController},
    ui::{app::HELP, render_app, Command, SubmitOutcome, TaskForm},
    Config, RequestError,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::{JoinError, JoinHandle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type Controller = Arc<TaskController<HttpTaskClient>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Logs go to stderr so they never interleave with the view on stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,taskflow=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env()?;
    tracing::info!("Using task API at {}", config.api_base_url);

    let client = HttpTaskClient::from_config(&config).context("failed to build HTTP client")?;
    let controller = Arc::new(TaskController::new(client));

    run(controller).await.context("terminal session failed")
}

type PendingAdd = JoinHandle<Result<(), RequestError>>;

/// What the loop does after a command.
enum Flow {
    Continue(Option<String>),
    Quit,
}

/// Front-end state owned by the input loop.
struct Session {
    controller: Controller,
    form: TaskForm,
    /// Create request started from the form, if one is in flight.
    pending_add: Option<PendingAdd>,
}

async fn run(controller: Controller) -> taskflow::Result<()> {
    let mut state_rx = controller.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut session = Session {
        controller,
        form: TaskForm::new(),
        pending_add: None,
    };

    // Initial load runs in the background so the prompt is usable right away
    let initial = Arc::clone(&session.controller);
    tokio::spawn(async move { initial.activate().await });

    session.draw(None)?;

    loop {
        tokio::select! {
            changed = state_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                state_rx.borrow_and_update();
                session.draw(None)?;
            }
            joined = join_pending(&mut session.pending_add), if session.pending_add.is_some() => {
                session.pending_add = None;
                let result = joined.unwrap_or_else(|e| {
                    Err(RequestError::new(format!("Task creation aborted: {}", e)))
                });
                session.form.finish(result);
                session.draw(None)?;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let notice = match Command::parse(&line) {
                    Ok(command) => match session.handle(command) {
                        Flow::Continue(notice) => notice,
                        Flow::Quit => break,
                    },
                    Err(msg) => Some(msg),
                };
                state_rx.borrow_and_update();
                session.draw(notice.as_deref())?;
            }
        }
    }

    Ok(())
}

/// Resolves when the in-flight add finishes; never resolves if there is none.
async fn join_pending(
    slot: &mut Option<PendingAdd>,
) -> Result<Result<(), RequestError>, JoinError> {
    match slot {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}

const BUSY: &str = "Still working, try again in a moment";

impl Session {
    /// Applies one command without waiting on the network, so the view keeps
    /// redrawing while requests are in flight.
    fn handle(&mut self, command: Command) -> Flow {
        let notice = match command {
            Command::Title(_) | Command::Desc(_) if self.pending_add.is_some() => {
                Some(BUSY.to_string())
            }
            Command::Title(title) => {
                self.form.set_title(title);
                None
            }
            Command::Desc(description) => {
                self.form.set_description(description);
                None
            }
            Command::Add => {
                let loading = self.pending_add.is_some() || self.controller.snapshot().loading;
                match self.form.prepare(loading) {
                    Ok(dto) => {
                        let controller = Arc::clone(&self.controller);
                        self.pending_add =
                            Some(tokio::spawn(async move { controller.add_task(dto).await }));
                        None
                    }
                    Err(SubmitOutcome::Busy) => Some(BUSY.to_string()),
                    Err(_) => None,
                }
            }
            Command::Done(n) => {
                let id = self.controller.snapshot().tasks.get(n - 1).map(|t| t.id);
                match id {
                    Some(id) => {
                        let controller = Arc::clone(&self.controller);
                        tokio::spawn(async move {
                            if let Err(e) = controller.mark_complete(id).await {
                                tracing::debug!(id, "Completion failed: {}", e);
                            }
                        });
                        None
                    }
                    None => Some(format!("No task #{} in the list", n)),
                }
            }
            Command::Refresh => {
                let controller = Arc::clone(&self.controller);
                tokio::spawn(async move { controller.fetch_all().await });
                None
            }
            Command::Help => Some(HELP.to_string()),
            Command::Quit => return Flow::Quit,
        };
        Flow::Continue(notice)
    }

    fn draw(&self, notice: Option<&str>) -> taskflow::Result<()> {
        let state = self.controller.snapshot();
        let mut stdout = std::io::stdout().lock();
        // clear screen, cursor home
        write!(stdout, "\x1B[2J\x1B[H")?;
        writeln!(stdout, "{}", render_app(&state, &self.form))?;
        if let Some(notice) = notice {
            writeln!(stdout, "\n{}", notice)?;
        }
        write!(stdout, "\n> ")?;
        stdout.flush()?;
        Ok(())
    }
}
