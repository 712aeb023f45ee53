pub mod signal_service;
pub mod telegram_service;

pub use signal_service::SignalService;
pub use telegram_service::TelegramService;
