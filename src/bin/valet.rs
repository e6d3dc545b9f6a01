use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use log::info;

use valet::{
    AppLauncher, Assistant, CalendarBook, ConsoleSpeech, DesktopSystem, HttpWebInfo,
    LookupSkill, ReminderScheduler, ReminderStore, SystemPort,
};
use valet::core::Config;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    info!("starting {}", config.assistant_name);

    let system: Arc<dyn SystemPort> = Arc::new(DesktopSystem::new());
    let web = Arc::new(HttpWebInfo::new(
        &config.weather_api_key,
        &config.news_api_key,
        &config.wolfram_api_key,
    ));

    let reminders = Arc::new(ReminderScheduler::load(ReminderStore::new(
        config.store_path("reminders.json"),
    )));
    let name = config.assistant_name.clone();
    reminders
        .set_alert(Arc::new(move |message| println!("{name}: {message}")))
        .await;
    let dispatcher = reminders.start();

    let calendar = CalendarBook::load(config.store_path("calendar_events.json"));
    let apps = AppLauncher::load(
        system.clone(),
        &config.default_applications,
        config.store_path("app_paths.json"),
    );
    let lookup = LookupSkill::new(
        web,
        system.clone(),
        config.search_engines.clone(),
        &config.default_search_engine,
    );

    let mut speech = ConsoleSpeech::new(&config.assistant_name);
    let mut assistant = Assistant::new(config, reminders, calendar, apps, lookup, system);
    assistant.run(&mut speech).await;

    dispatcher.abort();
    Ok(())
}
