//! Line commands for `waitlist-shell`, which stands in for the page: each
//! command is one user interaction with a form.

use std::fmt::Write;

use crate::notification::FeedbackKind;
use crate::widget::Slot;
use crate::widget::WaitlistWidget;

pub const HELP: &str = "\
commands (prefix with `top` or `bottom` to pick a form; default is top):
  email <address>   type into the email field (replaces its contents)
  agree | disagree  tick / untick the privacy checkbox
  submit            click the submit button
  share             click the share button (after a successful sign-up)
  demo              click the demo placeholder
  status            print every form
  help              this text
  quit";

#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    Email(String),
    Consent(bool),
    Submit,
    Share,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Widget { slot: Slot, action: Action },
    Demo,
    Status,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim_start();
        let (head, rest) = split_word(line);
        let (slot, explicit, head, rest) = match head {
            "top" => {
                let (h, r) = split_word(rest);
                (Slot::Top, true, h, r)
            }
            "bottom" => {
                let (h, r) = split_word(rest);
                (Slot::Bottom, true, h, r)
            }
            _ => (Slot::Top, false, head, rest),
        };

        let action = match head {
            // everything after `email ` is the field value, whitespace and all
            "email" => Action::Email(rest.trim_end_matches(['\r', '\n']).to_string()),
            "agree" => Action::Consent(true),
            "disagree" => Action::Consent(false),
            "submit" => Action::Submit,
            "share" => Action::Share,
            "demo" | "status" | "help" | "quit" | "exit" if explicit => {
                return Err(format!("`{head}` doesn't take a form"));
            }
            "demo" => return Ok(Self::Demo),
            "status" => return Ok(Self::Status),
            "help" => return Ok(Self::Help),
            "quit" | "exit" => return Ok(Self::Quit),
            "" => return Err("missing command".to_string()),
            other => return Err(format!("unknown command `{other}`; try `help`")),
        };
        Ok(Self::Widget { slot, action })
    }
}

fn split_word(s: &str) -> (&str, &str) {
    match s.split_once(' ') {
        Some((word, rest)) => (word.trim(), rest),
        None => (s.trim(), ""),
    }
}

/// One line per form, e.g.
///
/// ```text
/// [top] email="a@b.co" [얼리 액세스 신청하기] enabled, phase=Idle, 500+ joined
///   error: 올바른 이메일 주소를 입력해주세요.
/// ```
pub fn render(widget: &WaitlistWidget) -> String {
    let s = widget.snapshot();
    let mut out = format!(
        "[{}] email={:?} [{}] {}, phase={:?}, {}+ joined",
        widget.slot(),
        s.email,
        widget.submit_label(),
        match widget.is_submit_enabled() {
            true => "enabled",
            false => "disabled",
        },
        s.phase,
        s.signup_count,
    );
    if widget.options().require_privacy_consent {
        let _ = write!(
            out,
            ", consent={}",
            match s.privacy_consent {
                true => "yes",
                false => "no",
            }
        );
    }
    if s.share_visible {
        let _ = write!(out, ", share=[{}]", widget.share_label());
    }
    let label = match s.feedback.kind {
        FeedbackKind::None => None,
        FeedbackKind::Error => Some("error"),
        FeedbackKind::Success => Some("success"),
        FeedbackKind::Info => Some("info"),
    };
    if let Some(label) = label {
        let _ = write!(out, "\n  {label}: {}", s.feedback.text);
    }
    out
}
