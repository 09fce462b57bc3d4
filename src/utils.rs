use std::error::Error;
use std::fmt::Formatter;

/// Walk `source()` all the way down, so that `{:?}` on an error (which is what
/// `error.cause_chain = ?e` ends up calling) shows every layer, not just the
/// outermost message.
pub fn error_chain_fmt(
    e: &impl Error,
    f: &mut Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{e}\n")?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{cause}")?;
        current = cause.source();
    }
    Ok(())
}
