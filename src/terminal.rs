use std::io::{self, Write};

use termios::{tcsetattr, Termios, ECHO, ICANON, TCSANOW};
use tracing::{debug, warn};

const STDIN_FD: i32 = 0;

pub fn clear_screen() {
    print!("{}[2J", 27 as char);
    print!("{}[1;1H", 27 as char);
}

pub fn flush() {
    // a failed flush only loses a frame
    let _ = io::stdout().flush();
}

/// Puts stdin in non-canonical, no-echo mode for as long as it lives, so
/// single key presses reach the game without Enter.
pub struct RawMode {
    old_termios: Termios,
}

impl RawMode {
    pub fn enable() -> io::Result<Self> {
        let old_termios = Termios::from_fd(STDIN_FD)?;
        let mut new_termios = old_termios; // copy the termios struct
        new_termios.c_lflag &= !(ICANON | ECHO);
        tcsetattr(STDIN_FD, TCSANOW, &new_termios)?;
        debug!("terminal in raw mode");
        Ok(RawMode { old_termios })
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        // reset stdin to default
        if let Err(e) = tcsetattr(STDIN_FD, TCSANOW, &self.old_termios) {
            warn!(error = %e, "failed to restore terminal");
        }
    }
}
