#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use std::{env, path::PathBuf, sync::Arc};

use axum::{routing::get, Router};
use serenity::{prelude::GatewayIntents, Client};
use tracing::{error, info};

use crate::database::settings::SettingsStore;
use crate::models::{giveaway::GiveawayStore, handler::Handler, ticket::ClosingGuard};

mod commands;
mod common;
mod database;
mod events;
mod models;

#[tokio::main]
async fn main() {
    let log_level = match env::var("DEBUG").unwrap_or(false.to_string()).as_str() {
        "true" => tracing::Level::DEBUG,
        _ => tracing::Level::INFO,
    };
    tracing_subscriber::fmt().with_max_level(log_level).init();

    info!("Getting environment variables");
    let discord_token = env::var("DISCORD_TOKEN").unwrap();
    let settings_path = env::var("SETTINGS_PATH").unwrap_or("welcomer_settings.json".to_string());
    let port = env::var("PORT").unwrap_or("8080".to_string());

    info!("Loading welcomer settings from {settings_path}");
    let settings = SettingsStore::load(PathBuf::from(settings_path)).unwrap();

    // Minimal liveness endpoint so external uptime checks have something to hit.
    let liveness = Router::new().route("/", get(|| async { "Floh is running" }));
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .unwrap();
    info!("Liveness endpoint listening on port {port}");
    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, liveness).await {
            error!("Liveness endpoint stopped, failed with error: {err}");
        }
    });

    // Discord client connection
    let handler = Handler {
        giveaways: Arc::new(GiveawayStore::default()),
        settings: Arc::new(settings),
        closing_tickets: Arc::new(ClosingGuard::default()),
    };
    let intents = GatewayIntents::non_privileged()
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::MESSAGE_CONTENT;
    let mut client = Client::builder(&discord_token, intents)
        .event_handler(handler)
        .await
        .unwrap();

    if let Err(err) = client.start_autosharded().await {
        error!(
            "Attempted to start the Floh Discord client, but failed with error: {}",
            err
        );
    }
}
