mod commands;
mod config;
mod deadline;
mod error;
mod notifier;
mod store;
mod tasks;
mod util;

use crate::config::Config;
use crate::deadline::DeadlineRules;
use crate::notifier::{ChannelNotifier, Notifier};
use crate::tasks::reminders::backend::CronBackend;
use crate::tasks::reminders::scheduler::ReminderScheduler;
use crate::tasks::task_handler;
use poise::serenity_prelude as serenity;
use poise::serenity_prelude::Color;
use sqlx::SqlitePool;
use std::sync::Arc;

const BOT_COLOR: Color = Color::new(0xfcaaf9);

pub struct Data {
    deadline_rules: DeadlineRules,
    pool: SqlitePool,
    scheduler: ReminderScheduler,
    notifier: Arc<dyn Notifier>,
} // User data, which is stored and accessible in all command invocations
type Error = Box<dyn std::error::Error + Send + Sync>;
type Context<'a> = poise::Context<'a, Arc<Data>, Error>;
pub type Command = poise::Command<Arc<Data>, Error>;

#[tokio::main]
async fn main() {
    if dotenvy::dotenv().is_err() {
        eprintln!(".env file not found, reading configuration from the environment");
    }
    tracing_subscriber::fmt::init();
    let config = Config::from_env().unwrap_or_else(|e| panic!("invalid configuration: {e}"));
    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    let deadline_rules =
        DeadlineRules::new(config.deadline_time).expect("deadline pattern should compile");
    let pool = SqlitePool::connect(&config.database_url)
        .await
        .expect("failed to connect to the database");
    store::init_schema(&pool).await.expect("failed to create the assignments table");
    let backend = CronBackend::start().await.expect("failed to start the reminder scheduler");
    let scheduler = ReminderScheduler::new(Arc::new(backend));

    let guild_id = config.guild_id;
    let channel_id = config.channel_id;
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some("!".into()),
                ..Default::default()
            },
            commands: commands::commands(),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                tracing::info!("Bot is online as {}", ready.user.name);
                poise::builtins::register_in_guild(ctx, &framework.options().commands, guild_id)
                    .await?;
                let data = Arc::new(Data {
                    deadline_rules,
                    pool,
                    scheduler,
                    notifier: Arc::new(ChannelNotifier::new(ctx.http.clone(), channel_id)),
                });
                let data_clone = data.clone();
                tokio::spawn(async move { task_handler(data_clone).await });
                Ok(data)
            })
        })
        .build();

    let client = serenity::ClientBuilder::new(config.token, intents)
        .framework(framework)
        .await;
    client.expect("failed to create the client").start().await.expect("client error");
}
