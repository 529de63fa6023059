use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use tube_chat::api_client::ApiClient;
use tube_chat::config::AppConfig;
use tube_chat::console::ConsoleView;
use tube_chat::controller::{ChatController, SubmitOutcome, CHAT_REVEAL_DELAY};
use tube_chat::session::Screen;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_logging().expect("Failed to initialize logging");

    let config = AppConfig::from_env();
    let api = ApiClient::new(config.api_base_url.clone());

    // Startup probe; the client still starts if the backend is down.
    match api.health().await {
        Ok(health) => tracing::info!("Backend reachable, status: {}", health.status),
        Err(e) => tracing::warn!(
            "Backend not reachable at {}: {}",
            config.api_base_url,
            e
        ),
    }

    let view = Arc::new(ConsoleView::new());
    view.print_banner(&config.api_base_url);

    let mut controller = ChatController::new(Arc::new(api), view.clone());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        view.print_prompt(controller.screen());
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!("Failed to read input: {}", e);
                break;
            }
        };
        let input = line.trim();
        if input == "/quit" || input == "/exit" {
            break;
        }

        match controller.screen() {
            Screen::VideoInput => {
                if let SubmitOutcome::Processed(ticket) = controller.submit_video(input).await {
                    // Brief pause before revealing the chat screen.
                    tokio::time::sleep(CHAT_REVEAL_DELAY).await;
                    controller.reveal_chat(ticket);
                }
            }
            Screen::Chat => {
                if input == "/new" {
                    controller.reset_session();
                    continue;
                }
                controller.send_message(input).await;
            }
        }
    }

    println!("Bye! 👋");
}

// Logging configuration, shared shape with the backend services: EnvFilter
// plus a JSON or human-readable fmt layer, selected by LOG_FORMAT.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            "debug,tube_chat=trace,reqwest=info,hyper=info".to_string()
        } else {
            "warn,tube_chat=info,reqwest=warn,hyper=warn".to_string()
        }
    });

    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&log_level))?;

    // Logs go to stderr so they do not interleave with the chat transcript.
    let fmt_layer = if std::env::var("LOG_FORMAT").as_deref() == Ok("json") {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_current_span(true)
            .with_span_list(false)
            .with_target(true)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("💬 TubeChat client starting up...");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));

    Ok(())
}
