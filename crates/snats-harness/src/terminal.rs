//! Scripted terminal for driving sessions from tests.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use async_trait::async_trait;
use snats_core::{LineInput, LineOutput};

/// What happens once the scripted lines run out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tail {
    End,
    Wait,
    Fail,
}

/// Input that replays a fixed list of lines.
#[derive(Debug)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
    tail: Tail,
}

impl ScriptedInput {
    /// Replay `lines`, then report end of input.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { lines: lines.into_iter().map(Into::into).collect(), tail: Tail::End }
    }

    /// Input with no lines that never ends. The session only stops on
    /// shutdown.
    pub fn idle() -> Self {
        Self::new(Vec::<String>::new()).then_wait()
    }

    /// After the scripted lines, block forever instead of ending.
    #[must_use]
    pub fn then_wait(mut self) -> Self {
        self.tail = Tail::Wait;
        self
    }

    /// After the scripted lines, fail with an I/O error.
    #[must_use]
    pub fn then_fail(mut self) -> Self {
        self.tail = Tail::Fail;
        self
    }
}

#[async_trait]
impl LineInput for ScriptedInput {
    async fn read_line(&mut self) -> std::io::Result<Option<String>> {
        if let Some(line) = self.lines.pop_front() {
            tokio::task::yield_now().await;
            return Ok(Some(line));
        }

        match self.tail {
            Tail::End => Ok(None),
            Tail::Wait => std::future::pending().await,
            Tail::Fail => Err(std::io::Error::other("scripted input failure")),
        }
    }
}

#[derive(Debug, Default)]
struct Captured {
    lines: Vec<String>,
    prompts: usize,
}

/// Output that records every rendered line.
#[derive(Debug, Clone, Default)]
pub struct CapturedOutput {
    inner: Arc<Mutex<Captured>>,
}

impl CapturedOutput {
    /// Create an empty capture.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines rendered so far, in order.
    pub fn lines(&self) -> Vec<String> {
        self.lock().lines.clone()
    }

    /// Number of times the prompt was shown.
    pub fn prompts(&self) -> usize {
        self.lock().prompts
    }

    /// Wait until `line` has been rendered, up to `timeout`.
    ///
    /// Returns false if it never showed up.
    pub async fn wait_for(&self, line: &str, timeout: Duration) -> bool {
        let seen = async {
            while !self.lock().lines.iter().any(|l| l == line) {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        };

        tokio::time::timeout(timeout, seen).await.is_ok()
    }

    fn lock(&self) -> MutexGuard<'_, Captured> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LineOutput for CapturedOutput {
    fn render(&self, line: &str) {
        self.lock().lines.push(line.to_owned());
    }

    fn show_prompt(&self, _name: &str) {
        self.lock().prompts += 1;
    }
}
