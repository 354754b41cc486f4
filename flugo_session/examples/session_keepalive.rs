use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::Parser;
use flugo_session::{
    gateway::{Credentials, HttpGateway},
    store::FileStore,
    Password, SessionManager, Username,
};
use tokio::time;
use tracing_subscriber::filter::EnvFilter;

#[derive(Debug, Parser)]
struct Opts {
    /// The base URL of the reservation platform's API
    #[arg(long, env)]
    base_url: reqwest::Url,

    /// The account to authenticate as; anonymous when omitted
    #[arg(long, env)]
    username: Option<String>,

    /// The account's password
    #[arg(long, env, hide_env_values = true)]
    password: Option<String>,

    /// The file used to cache the session across runs
    #[arg(long, env, value_name = "FILE", default_value = ".flugo-session.json")]
    session_file: PathBuf,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    let _ = dotenvy::dotenv();
    color_eyre::install()?;

    let opts = Opts::parse();

    tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let credentials = match (opts.username, opts.password) {
        (Some(username), Some(password)) => Credentials::Password {
            username: Username::new(username),
            password: Password::new(password),
        },
        _ => Credentials::Anonymous,
    };

    let client = reqwest::Client::builder().https_only(true).build()?;

    let gateway = HttpGateway::new(client, opts.base_url);
    let store = FileStore::new(opts.session_file);

    let sessions = SessionManager::new(Arc::new(gateway), Arc::new(store));

    let mut events = sessions.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            tracing::info!(?event, "session lifecycle event");
        }
    });

    if sessions.restore_latest() {
        tracing::info!(
            remaining = sessions.token_expires_in().0,
            "resumed a cached session"
        );
    } else {
        sessions.create(credentials.clone()).await?;
        tracing::info!("established a new session");
    }

    let mut interval = time::interval(Duration::from_secs(5));

    loop {
        interval.tick().await;

        if sessions.is_token_expired() {
            tracing::error!("session expired, establishing a new one");
            sessions.create(credentials.clone()).await?;
        } else if sessions.is_token_expiring_soon() {
            tracing::warn!(
                remaining = sessions.token_expires_in().0,
                "session expiring soon, sending a keep-alive"
            );
            sessions.refresh(None).await?;
        } else {
            tracing::debug!(
                remaining = sessions.token_expires_in().0,
                "session healthy"
            );
        }
    }
}
