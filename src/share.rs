use std::io::Write;
use std::sync::Mutex;
use std::sync::PoisonError;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Where `copy_share_link` puts the link. Kept as a trait so the widget
/// doesn't care whether it's running behind a terminal, a test, or something
/// else entirely.
pub trait Clipboard: Send + Sync {
    fn set_text(
        &self,
        text: &str,
    ) -> Result<(), anyhow::Error>;
}

/// Copies via the OSC 52 escape sequence, which most terminal emulators (and
/// tmux with `set-clipboard on`) forward to the system clipboard. Terminals
/// that don't understand it just ignore the sequence, so a successful write is
/// not proof that anything was copied.
pub struct Osc52Clipboard<W> {
    out: Mutex<W>,
}

impl<W: Write> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self { Self { out: Mutex::new(out) } }

    pub fn into_inner(self) -> W { self.out.into_inner().unwrap_or_else(PoisonError::into_inner) }
}

impl<W: Write + Send> Clipboard for Osc52Clipboard<W> {
    fn set_text(
        &self,
        text: &str,
    ) -> Result<(), anyhow::Error> {
        // ESC ] 52 ; c ; <base64> BEL
        let payload = STANDARD.encode(text);
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        write!(out, "\x1b]52;c;{payload}\x07")?;
        out.flush()?;
        Ok(())
    }
}
