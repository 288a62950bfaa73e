// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! SerenitySphere server binary.
//!
//! `serve` (default) runs the HTTP + WebSocket server; `chat` sends one
//! message to a running server and prints the suggested moods, answering
//! locally if the server cannot be reached.

use std::time::Duration;

use clap::{Parser, Subcommand};
use serenity_core::chat::{ChatAssistant, ChatRequest, ReplySource};
use serenity_server::client::HttpChatBackend;
use serenity_server::{router, AppState, ServerConfig};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "serenity-server", version, about = "Mood-based relaxation experiences")]
struct Cli {
    #[command(flatten)]
    server: ServerConfig,

    #[command(subcommand)]
    cmd: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the server (default)
    Serve,
    /// Ask the chat assistant for mood suggestions
    Chat {
        /// Base URL of a running server
        #[arg(long, env = "SERENITY_URL", default_value = "http://localhost:5000")]
        url: String,
        #[arg(long, default_value = "cli")]
        session: String,
        #[arg(long)]
        user: Option<u32>,
        /// Message text
        #[arg(required = true)]
        message: Vec<String>,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("serenity_server=info,serenity_viz=info,serenity_core=info"));
    fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.cmd.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(cli.server).await,
        Commands::Chat { url, session, user, message } => chat(&url, session, user, message.join(" ")).await,
    }
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let issues = config.validate();
    if !issues.is_empty() {
        anyhow::bail!("invalid configuration: {}", issues.join("; "));
    }

    let state = AppState::new(config.experience(), config.seed);
    let app = router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("SerenitySphere running on http://{addr} ({} Hz frames)", config.frame_hz);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn chat(url: &str, session: String, user: Option<u32>, message: String) -> anyhow::Result<()> {
    let backend = HttpChatBackend::new(url, Duration::from_secs(5))?;
    let assistant = ChatAssistant::new(backend);

    let mut request = ChatRequest::new(message, session);
    if let Some(user) = user {
        request = request.with_user(user);
    }

    let outcome = assistant.ask(&request).await?;
    if outcome.source == ReplySource::LocalFallback {
        eprintln!("(offline: answered from local rules)");
    }
    println!("{}", outcome.reply.message);
    for mood in &outcome.reply.suggested_moods {
        println!("  {:<10} {}  ->  /experience/{}", mood.name, mood.description, mood.name.to_lowercase());
    }
    Ok(())
}
