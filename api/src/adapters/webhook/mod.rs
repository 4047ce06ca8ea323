//! Webhook adapters

pub mod notifier;

pub use notifier::WebhookNotifier;
