//! Console bot: drives the standard conversation graph from stdin.
//!
//! Type `/cb <payload>` to press a button (payloads are printed next to
//! each button), anything else is sent as free text. Logs go to stderr;
//! set `RUST_LOG=chatflow=debug` to watch commits.
//!
//! ```text
//! cargo run --example console_bot
//! ```

use async_trait::async_trait;
use chatflow::collab::memory::MemoryUserStore;
use chatflow::collab::{Messenger, MessengerError};
use chatflow::core::{State, Transition, UserId};
use chatflow::dispatch::{DispatchConfig, Dispatcher};
use chatflow::handler::{EntryHandler, HandlerRegistry, MenuHandler, ParamRules};
use chatflow::message::{Button, Keyboard, OutgoingMessage};
use chatflow::payload::Payload;
use chatflow::router::Router;
use chatflow::table::TransitionTable;
use chatflow::update::{Sender, Update};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const CONSOLE_USER: UserId = UserId(1);

struct ConsoleMessenger;

impl ConsoleMessenger {
    fn print(&self, header: &str, message: &OutgoingMessage) {
        println!("{header} {}", message.text);
        for row in message.keyboard.iter().flat_map(|k| k.rows()) {
            let cells: Vec<_> = row
                .iter()
                .map(|b| format!("[{}] /cb {}", b.label, b.payload))
                .collect();
            println!("    {}", cells.join("   "));
        }
    }
}

#[async_trait]
impl Messenger for ConsoleMessenger {
    async fn send(&self, _user: UserId, message: OutgoingMessage) -> Result<(), MessengerError> {
        self.print("bot>", &message);
        Ok(())
    }

    async fn edit(
        &self,
        _user: UserId,
        message_id: &str,
        message: OutgoingMessage,
    ) -> Result<(), MessengerError> {
        self.print(&format!("bot (edit {message_id})>"), &message);
        Ok(())
    }
}

/// One button per edge leaving `state`, labelled with its destination.
fn edge_buttons(table: &TransitionTable, state: State) -> Keyboard {
    table
        .available(state)
        .into_iter()
        .filter(|t| *t != Transition::Reset)
        .filter_map(|t| table.edge(t).map(|edge| (t, edge.dest)))
        .fold(Keyboard::new(), |keyboard, (t, dest)| {
            keyboard.button(Button::new(dest.name(), t))
        })
        .button(Button::new("Start over", Transition::Reset))
}

fn events_keyboard(table: &TransitionTable) -> Keyboard {
    let open = |id: &str| {
        Button::with_payload(
            format!("Event #{id}"),
            &Payload::new(Transition::EventsToEvent).with_param("id", id),
        )
    };
    let page = |label: &str, n: &str| {
        Button::with_payload(label, &Payload::new(Transition::Loop).with_param("page", n))
    };

    Keyboard::new()
        .row(vec![open("1"), open("2")])
        .row(vec![page("<<", "1"), page(">>", "2")])
        .row(edge_buttons(table, State::Events).rows().iter().flatten().cloned().collect())
}

fn handlers(messenger: Arc<dyn Messenger>, table: &TransitionTable) -> HandlerRegistry {
    let page_rules = ParamRules::new()
        .require_positive_int("page")
        .only_on(Transition::Loop);

    State::ALL
        .iter()
        .filter(|s| !matches!(s, State::Empty | State::Events))
        .fold(
            HandlerRegistry::new()
                .register(State::Empty, EntryHandler::new(Transition::EmptyToNewUser))
                .register(
                    State::Events,
                    MenuHandler::new(messenger.clone(), "Upcoming events:")
                        .keyboard(events_keyboard(table))
                        .rules(page_rules),
                ),
            |registry, state| {
                registry.register(
                    *state,
                    MenuHandler::new(messenger.clone(), format!("== {} ==", state.name()))
                        .keyboard(edge_buttons(table, *state)),
                )
            },
        )
}

fn parse_line(line: &str) -> Option<Update> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let update = match line.strip_prefix("/cb ") {
        Some(payload) => Update::callback(CONSOLE_USER, payload.trim()),
        None => Update::message(CONSOLE_USER, line),
    };
    Some(update.with_sender(Sender {
        username: Some("console".to_string()),
        name: "Console User".to_string(),
    }))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .init();

    let config = match std::env::var("CHATFLOW_CONFIG") {
        Ok(path) => DispatchConfig::from_file(path)?,
        Err(_) => DispatchConfig::default(),
    }
    .with_env_overrides()?;
    tracing::info!(?config, "Starting console bot");

    let table = TransitionTable::standard();
    let messenger: Arc<dyn Messenger> = Arc::new(ConsoleMessenger);
    let store = Arc::new(MemoryUserStore::new());
    let router = Router::new(handlers(messenger.clone(), &table), store, messenger);
    let dispatcher = Dispatcher::new(Arc::new(router), config);

    let (tx, rx) = futures::channel::mpsc::unbounded();
    let shutdown = CancellationToken::new();

    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                shutdown.cancel();
            }
        }
    });

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if let Some(update) = parse_line(&line) {
                if tx.unbounded_send(update).is_err() {
                    break;
                }
            }
        }
    });

    println!("Say anything to start. Ctrl-D or Ctrl-C to quit.");
    let handled = dispatcher.run(rx, shutdown).await;
    tracing::info!(handled, "Console bot stopped");
    Ok(())
}
