use crossterm::{
    event::{self, Event, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use std::io::{self, stdin, stdout, IsTerminal, Result, Write};

/// Restores cooked mode when dropped, even if reading the key failed.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Print `prompt` and block until a key is pressed.
///
/// Does nothing when stdin is not an interactive terminal.
pub fn wait_for_keypress(prompt: &str) -> Result<()> {
    if !stdin().is_terminal() {
        return Ok(());
    }

    let mut out = stdout();
    write!(out, "{prompt}")?;
    out.flush()?;

    {
        let _guard = RawModeGuard::enable()?;
        loop {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => break,
                _ => {}
            }
        }
    }

    writeln!(io::stdout())?;
    Ok(())
}
