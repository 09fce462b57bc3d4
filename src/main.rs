use std::sync::Arc;

use anyhow::Context;
use perfect_swing_waitlist::configuration::get_configuration;
use perfect_swing_waitlist::page::LandingPage;
use perfect_swing_waitlist::share::Osc52Clipboard;
use perfect_swing_waitlist::shell::render;
use perfect_swing_waitlist::shell::Action;
use perfect_swing_waitlist::shell::Command;
use perfect_swing_waitlist::shell::HELP;
use perfect_swing_waitlist::telemetry::get_subscriber;
use perfect_swing_waitlist::telemetry::init_subscriber;
use perfect_swing_waitlist::widget::WaitlistWidget;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;

/// Print the form every time its state changes, including the timed
/// dismissals nobody asked for
fn spawn_renderer(widget: Arc<WaitlistWidget>) -> tokio::task::JoinHandle<()> {
    let mut rx = widget.subscribe();
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            rx.borrow_and_update();
            println!("{}", render(&widget));
        }
    })
}

/// Load config, init telemetry, build the page, then feed it stdin
#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // stdout is the "page"; logs go to stderr so they don't interleave with it
    let subscriber = get_subscriber("waitlist-shell", "info", std::io::stderr);
    init_subscriber(subscriber)?;

    let cfg = get_configuration().context("Failed to load configuration")?;
    let variant = cfg.page.variant().map_err(anyhow::Error::msg)?;
    let client = cfg
        .waitlist
        .client()
        .context("Failed to build waitlist client")?;
    if !cfg.waitlist.is_configured() {
        tracing::warn!("waitlist collector not configured; submissions will fail");
    }

    let page = LandingPage::build(
        variant,
        &client,
        cfg.page.share_url.clone(),
        cfg.page.initial_signup_count,
    );
    tracing::info!(
        locale = %page.variant.locale,
        collection_path = %page.variant.collection_path(),
        dual_form = page.variant.dual_form,
        "page ready"
    );

    let renderers: Vec<_> = page.widgets().cloned().map(spawn_renderer).collect();
    let clipboard = Osc52Clipboard::new(std::io::stdout());

    println!("{HELP}\n");
    for widget in page.widgets() {
        println!("{}", render(widget));
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => println!("{HELP}"),
            Command::Status => page.widgets().for_each(|w| println!("{}", render(w))),
            Command::Demo => page.top.demo_click(),
            Command::Widget { slot, action } => {
                let Some(widget) = page.widget(slot) else {
                    println!("this page has no {slot} form");
                    continue;
                };
                match action {
                    Action::Email(email) => widget.set_email(email),
                    Action::Consent(agreed) => widget.set_privacy_consent(agreed),
                    // like a click handler: the page stays responsive while the
                    // request is in flight
                    Action::Submit => {
                        let widget = Arc::clone(widget);
                        tokio::spawn(async move { widget.submit().await });
                    }
                    Action::Share => {
                        widget.copy_share_link(&clipboard);
                    }
                }
            }
        }
    }

    for renderer in renderers {
        renderer.abort();
    }
    Ok(())
}
