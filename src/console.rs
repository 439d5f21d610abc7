use serde_json::Value;
use std::{
    io::{self, Write},
    sync::{Arc, Mutex},
};
use yansi::Paint;

/// Operator-facing trace of the run.
///
/// Everything the operator reads goes through here; diagnostics for
/// developers go through `tracing` on stderr instead.
pub struct Console {
    out: Box<dyn Write + Send>,
    color: bool,
}

impl Console {
    pub fn stdout(color: bool) -> Self {
        Self {
            out: Box::new(io::stdout()),
            color,
        }
    }

    /// Console writing into an in-memory buffer, readable through the returned handle
    pub fn capture() -> (Self, Captured) {
        let captured = Captured::default();
        let console = Self {
            out: Box::new(captured.clone()),
            color: false,
        };
        (console, captured)
    }

    pub fn line(&mut self, text: &str) {
        // A closed stdout must not abort the run before cleanup
        let _ = writeln!(self.out, "{text}");
        let _ = self.out.flush();
    }

    pub fn banner(&mut self, text: &str) {
        if self.color {
            self.line(&Paint::bold(text).to_string());
        } else {
            self.line(text);
        }
    }

    pub fn success(&mut self, text: &str) {
        if self.color {
            self.line(&Paint::green(text).bold().to_string());
        } else {
            self.line(text);
        }
    }

    pub fn failure(&mut self, text: &str) {
        if self.color {
            self.line(&Paint::red(text).bold().to_string());
        } else {
            self.line(text);
        }
    }

    pub fn sent(&mut self, line: &str) {
        self.line(&format!("→ Sending: {line}"));
    }

    pub fn received(&mut self, message: &Value) {
        let pretty = serde_json::to_string_pretty(message).unwrap_or_else(|_| message.to_string());
        self.line(&format!("← Received: {pretty}"));
    }
}

/// Shared buffer behind [`Console::capture`]
#[derive(Clone, Default)]
pub struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    pub fn contents(&self) -> String {
        let buf = self.0.lock().unwrap_or_else(|e| e.into_inner());
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
