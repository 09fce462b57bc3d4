pub mod configuration;
pub mod domain;
pub mod locale;
pub mod notification;
pub mod page;
pub mod share;
pub mod shell;
pub mod telemetry;
pub mod utils;
pub mod waitlist_client;
pub mod widget;
