use crate::agent::EffortTier;
use crate::dispatch::{AgentRunner, ProgressNotifier, RunOptions, RunnerError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock, Mutex, MutexGuard};
use std::time::Duration;
use tempfile::TempDir;

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // The process working directory is global; serialize tests that move it.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// A fresh git repository with one commit.
pub(crate) fn create_test_repo() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path();

    git(path, &["init"]);
    git(path, &["config", "user.email", "test@example.com"]);
    git(path, &["config", "user.name", "Test User"]);
    std::fs::write(path.join("README.md"), "# Test\n").unwrap();
    git(path, &["add", "."]);
    git(path, &["commit", "-m", "Initial commit"]);

    temp_dir
}

fn git(repo_dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .current_dir(repo_dir)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to execute git {}: {}", args.join(" "), e));

    if !output.status.success() {
        panic!(
            "git {} failed (exit code {:?})\nstderr:\n{}",
            args.join(" "),
            output.status.code(),
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

/// Write a `<id>.md` prompt file for every id into `dir`.
pub(crate) fn write_prompts(dir: &Path, ids: &[&str]) {
    std::fs::create_dir_all(dir).unwrap();
    for id in ids {
        std::fs::write(
            dir.join(format!("{}.md", id)),
            format!("# {}\n\nYou are the {} expert.\n", id, id),
        )
        .unwrap();
    }
}

/// Replies with a fixed response, optionally after a delay, and records calls.
#[derive(Default)]
pub(crate) struct ScriptedRunner {
    response: String,
    delay: Option<Duration>,
    calls: Mutex<Vec<(String, RunOptions)>>,
}

impl ScriptedRunner {
    pub(crate) fn replying(response: &str) -> Self {
        Self {
            response: response.to_string(),
            ..Self::default()
        }
    }

    pub(crate) fn after(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn calls(&self) -> Vec<(String, RunOptions)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AgentRunner for ScriptedRunner {
    async fn run(&self, prompt: &str, options: &RunOptions) -> Result<String, RunnerError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), options.clone()));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.response.clone())
    }
}

/// Always fails as if the agent exited non-zero.
pub(crate) struct FailingRunner {
    stderr: String,
}

impl FailingRunner {
    pub(crate) fn new(stderr: &str) -> Self {
        Self {
            stderr: stderr.to_string(),
        }
    }
}

#[async_trait]
impl AgentRunner for FailingRunner {
    async fn run(&self, _prompt: &str, _options: &RunOptions) -> Result<String, RunnerError> {
        Err(RunnerError::Exit {
            status: "exit status: 1".to_string(),
            stderr: self.stderr.clone(),
        })
    }
}

/// Never finishes; records whether its future was dropped.
#[derive(Default)]
pub(crate) struct StallingRunner {
    cancelled: Arc<AtomicBool>,
}

impl StallingRunner {
    pub(crate) fn was_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

struct SetOnDrop(Arc<AtomicBool>);

impl Drop for SetOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl AgentRunner for StallingRunner {
    async fn run(&self, _prompt: &str, _options: &RunOptions) -> Result<String, RunnerError> {
        let _guard = SetOnDrop(self.cancelled.clone());
        let never = std::future::pending::<String>().await;
        Ok(never)
    }
}

/// Counts progress ticks and records the finish status.
#[derive(Default)]
pub(crate) struct TickCounter {
    ticks: AtomicUsize,
    started: Mutex<Option<(EffortTier, Duration)>>,
    finished: Mutex<Option<bool>>,
}

impl TickCounter {
    pub(crate) fn ticks(&self) -> usize {
        self.ticks.load(Ordering::SeqCst)
    }

    pub(crate) fn started(&self) -> Option<(EffortTier, Duration)> {
        *self.started.lock().unwrap()
    }

    pub(crate) fn finished(&self) -> Option<bool> {
        *self.finished.lock().unwrap()
    }
}

impl ProgressNotifier for TickCounter {
    fn on_start(&self, effort: EffortTier, timeout: Duration) {
        *self.started.lock().unwrap() = Some((effort, timeout));
    }

    fn on_tick(&self, _elapsed: Duration) {
        // Ticks after finish would mean the ticker outlived the race.
        assert!(self.finished().is_none(), "tick after finish");
        self.ticks.fetch_add(1, Ordering::SeqCst);
    }

    fn on_finish(&self, _elapsed: Duration, success: bool) {
        *self.finished.lock().unwrap() = Some(success);
    }
}
