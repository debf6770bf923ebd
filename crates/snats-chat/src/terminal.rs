//! Terminal input and output.
//!
//! Stdin is read on a dedicated OS thread. A read blocked in the kernel would
//! otherwise hold up runtime shutdown after Ctrl-C.

use std::{
    io::{BufRead, Write},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use snats_core::{LineInput, LineOutput};
use tokio::sync::mpsc;

/// Clears the current terminal line and returns the cursor to column 0.
const CLEAR_LINE: &str = "\x1b[2K\r";

/// Line input fed by a background reader thread.
#[derive(Debug)]
pub struct LineReader {
    lines: mpsc::UnboundedReceiver<std::io::Result<String>>,
}

impl LineReader {
    /// Read lines from the process's stdin.
    pub fn stdin() -> Self {
        Self::spawn(std::io::BufReader::new(std::io::stdin()))
    }

    /// Read lines from `reader` on a new thread.
    ///
    /// Line terminators (`\n` or `\r\n`) are stripped. The thread exits at end
    /// of input, after the first read error, or once this reader is dropped
    /// and another line arrives.
    pub fn spawn<R: BufRead + Send + 'static>(reader: R) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        std::thread::spawn(move || {
            for line in reader.lines() {
                let failed = line.is_err();
                if tx.send(line).is_err() || failed {
                    break;
                }
            }
        });

        Self { lines: rx }
    }
}

#[async_trait]
impl LineInput for LineReader {
    async fn read_line(&mut self) -> std::io::Result<Option<String>> {
        self.lines.recv().await.transpose()
    }
}

/// Line output that redraws the prompt under each rendered line.
///
/// Write errors are ignored: a broken terminal should not end the session.
pub struct TerminalOutput<W> {
    writer: Arc<Mutex<W>>,
}

impl TerminalOutput<std::io::Stdout> {
    /// Output to the process's stdout.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send + 'static> TerminalOutput<W> {
    /// Output to `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer: Arc::new(Mutex::new(writer)) }
    }

    /// Write `text` as is and flush.
    pub fn write_raw(&self, text: &str) {
        let mut writer = self.lock();
        let _ = writer.write_all(text.as_bytes());
        let _ = writer.flush();
    }

    /// End the prompt line so the shell starts on a fresh one.
    pub fn finish_line(&self) {
        self.write_raw("\n");
    }

    fn lock(&self) -> MutexGuard<'_, W> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W> Clone for TerminalOutput<W> {
    fn clone(&self) -> Self {
        Self { writer: Arc::clone(&self.writer) }
    }
}

impl<W> std::fmt::Debug for TerminalOutput<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalOutput").finish_non_exhaustive()
    }
}

impl<W: Write + Send + 'static> LineOutput for TerminalOutput<W> {
    fn render(&self, line: &str) {
        self.write_raw(&format!("{CLEAR_LINE}{line}\n"));
    }

    fn show_prompt(&self, name: &str) {
        self.write_raw(&format!("[{name}] "));
    }
}
