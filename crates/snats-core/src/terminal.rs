//! Line-oriented terminal abstraction.

use async_trait::async_trait;

/// Source of chat lines typed by the local participant.
#[async_trait]
pub trait LineInput: Send {
    /// Wait for the next line, without its terminator.
    ///
    /// Returns `Ok(None)` at end of input.
    async fn read_line(&mut self) -> std::io::Result<Option<String>>;
}

/// Sink for rendered chat lines.
///
/// Output is best-effort: implementations swallow their own write errors.
/// Cloned handles write to the same sink, so the delivery task and the input
/// loop can both hold one.
pub trait LineOutput: Clone + Send + Sync + 'static {
    /// Print one rendered line such as `[bob] hi`.
    fn render(&self, line: &str);

    /// Re-display the input prompt for `name`.
    fn show_prompt(&self, name: &str);
}
