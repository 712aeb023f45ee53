use anyhow::Context;
use dotenvy::dotenv;
use teloxide::prelude::*;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use common::{config::AppConfig, logger, models::InboundImage};
use ocr::OcrSpaceClient;
use parser::SignalParser;

use crate::gateway::TelegramGateway;
use crate::services::{SignalService, TelegramService};

mod gateway;
mod services;

const IMAGE_QUEUE_SIZE: usize = 64;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    logger::setup_logger();
    debug!("System starting up...");

    let config = AppConfig::from_env().context("Invalid configuration")?;
    debug!("Loaded {:?}", config);

    let ocr = OcrSpaceClient::new(&config.ocr)?;
    let parser = SignalParser::from_config(&config.parser)?;

    let bot = Bot::new(config.telegram.token.clone()).set_api_url(config.telegram.api_url.clone());
    let gateway = TelegramGateway::new(bot.clone(), ChatId(config.telegram.output_chat_id));

    let (image_tx, image_rx) = mpsc::channel::<InboundImage>(IMAGE_QUEUE_SIZE);

    let signal_svc = SignalService::new(ocr, gateway, parser, &config.parser);
    let signal_handle = tokio::spawn(signal_svc.start(image_rx));

    let telegram_svc = TelegramService::new(bot, &config.telegram);
    if let Err(e) = telegram_svc.start(image_tx).await {
        error!("Telegram service failed: {:#}", e);
        signal_handle.abort();
        return Err(e);
    }

    // The dispatcher dropped its sender; wait for queued screenshots.
    signal_handle.await?;
    info!("Shut down cleanly.");
    Ok(())
}
