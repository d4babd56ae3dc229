//! Construction point for external commands
//!
//! [`ProcessRunner`] builds a not-yet-started [`ProcessHandle`]; the caller
//! decides where output goes and drives start/wait itself. [`SystemRunner`]
//! runs real binaries through `tokio::process`. [`ScriptedRunner`] replays
//! canned diagnostic output instead, so the clone orchestrator can be
//! exercised without a network or a git binary.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tokio::io::{AsyncBufRead, AsyncRead, BufReader, ReadBuf};
use tokio::process::{Child, Command};

/// Readable handle on a process's standard error
pub type DiagnosticStream = Box<dyn AsyncBufRead + Send + Unpin>;

/// Where a child's stdout or stderr is routed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Shared with the parent, so the user sees git's native output
    Inherit,
    /// Captured and readable by the caller
    Piped,
    /// Discarded
    Null,
}

impl OutputMode {
    fn to_stdio(self) -> Stdio {
        match self {
            OutputMode::Inherit => Stdio::inherit(),
            OutputMode::Piped => Stdio::piped(),
            OutputMode::Null => Stdio::null(),
        }
    }
}

/// Exit status of a finished process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessExit {
    code: Option<i32>,
}

impl ProcessExit {
    pub fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    /// A process terminated by a signal, without an exit code
    pub fn signalled() -> Self {
        Self { code: None }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Exit code, or -1 when the process was terminated by a signal
    pub fn code(&self) -> i32 {
        self.code.unwrap_or(-1)
    }
}

impl From<std::process::ExitStatus> for ProcessExit {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

/// A configured external command whose lifecycle the caller controls
#[async_trait]
pub trait ProcessHandle: Send {
    fn set_stdout(&mut self, mode: OutputMode);

    fn set_stderr(&mut self, mode: OutputMode);

    /// Set an environment variable for the child, on top of the inherited ones
    fn set_env(&mut self, key: &str, value: &str);

    /// Take the piped stderr stream; only available after `start` with
    /// stderr set to [`OutputMode::Piped`]
    fn take_stderr(&mut self) -> Option<DiagnosticStream>;

    async fn start(&mut self) -> io::Result<()>;

    async fn wait(&mut self) -> io::Result<ProcessExit>;

    /// Terminate a started process and reap it
    async fn kill(&mut self) -> io::Result<()>;

    /// Run to completion, returning the exit status and stdout followed by stderr
    async fn combined_output(&mut self) -> io::Result<(ProcessExit, Vec<u8>)>;
}

/// Builds process handles; building never fails
pub trait ProcessRunner: Send + Sync {
    fn command(&self, dir: Option<&Path>, program: &str, args: &[String]) -> Box<dyn ProcessHandle>;
}

/// Runs real binaries on the host
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn command(&self, dir: Option<&Path>, program: &str, args: &[String]) -> Box<dyn ProcessHandle> {
        let mut command = Command::new(program);
        command.args(args).kill_on_drop(true);
        if let Some(dir) = dir {
            command.current_dir(dir);
        }
        Box::new(SystemProcess {
            command,
            child: None,
        })
    }
}

struct SystemProcess {
    command: Command,
    child: Option<Child>,
}

impl SystemProcess {
    fn child_mut(&mut self) -> io::Result<&mut Child> {
        self.child
            .as_mut()
            .ok_or_else(|| io::Error::other("process has not been started"))
    }
}

#[async_trait]
impl ProcessHandle for SystemProcess {
    fn set_stdout(&mut self, mode: OutputMode) {
        self.command.stdout(mode.to_stdio());
    }

    fn set_stderr(&mut self, mode: OutputMode) {
        self.command.stderr(mode.to_stdio());
    }

    fn set_env(&mut self, key: &str, value: &str) {
        self.command.env(key, value);
    }

    fn take_stderr(&mut self) -> Option<DiagnosticStream> {
        let stderr = self.child.as_mut()?.stderr.take()?;
        Some(Box::new(BufReader::new(stderr)))
    }

    async fn start(&mut self) -> io::Result<()> {
        if self.child.is_some() {
            return Err(io::Error::other("process already started"));
        }
        self.child = Some(self.command.spawn()?);
        Ok(())
    }

    async fn wait(&mut self) -> io::Result<ProcessExit> {
        let status = self.child_mut()?.wait().await?;
        Ok(status.into())
    }

    async fn kill(&mut self) -> io::Result<()> {
        match self.child.as_mut() {
            Some(child) => child.kill().await,
            None => Ok(()),
        }
    }

    async fn combined_output(&mut self) -> io::Result<(ProcessExit, Vec<u8>)> {
        self.command.stdout(Stdio::piped()).stderr(Stdio::piped());
        let output = self.command.output().await?;
        let mut combined = output.stdout;
        combined.extend_from_slice(&output.stderr);
        Ok((output.status.into(), combined))
    }
}

/// Canned behaviour for one command built by [`ScriptedRunner`]
#[derive(Debug, Clone)]
pub struct Script {
    stderr: Vec<u8>,
    stream_error: Option<String>,
    exit: ProcessExit,
    hang: bool,
}

impl Script {
    /// Exit with `code` after emitting nothing
    pub fn exit(code: i32) -> Self {
        Self {
            stderr: Vec::new(),
            stream_error: None,
            exit: ProcessExit::from_code(code),
            hang: false,
        }
    }

    /// Exit successfully after emitting `lines` on stderr
    pub fn lines(lines: &[&str]) -> Self {
        Self::exit(0).with_lines(lines)
    }

    pub fn with_lines(mut self, lines: &[&str]) -> Self {
        for line in lines {
            self.stderr.extend_from_slice(line.as_bytes());
            self.stderr.push(b'\n');
        }
        self
    }

    /// Make every read of stderr fail with `message`
    pub fn with_stream_error(mut self, message: &str) -> Self {
        self.stream_error = Some(message.to_string());
        self
    }

    /// Never exit on its own; only a kill ends the process
    pub fn hanging() -> Self {
        Self {
            hang: true,
            ..Self::exit(0)
        }
    }
}

/// A command built by [`ScriptedRunner`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub dir: Option<PathBuf>,
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

impl Invocation {
    /// Value the command was given for `key`, if any
    pub fn env_var(&self, key: &str) -> Option<&str> {
        self.env
            .iter()
            .rev()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }
}

/// Replays [`Script`]s in order, one per built command
///
/// Commands built after the scripts run out exit successfully and silently.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    scripts: Mutex<VecDeque<Script>>,
    invocations: Arc<Mutex<Vec<Invocation>>>,
}

impl ScriptedRunner {
    pub fn new(scripts: Vec<Script>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into()),
            invocations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every command built so far, in order
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations
            .lock()
            .map(|invocations| invocations.clone())
            .unwrap_or_default()
    }
}

impl ProcessRunner for ScriptedRunner {
    fn command(&self, dir: Option<&Path>, program: &str, args: &[String]) -> Box<dyn ProcessHandle> {
        let index = match self.invocations.lock() {
            Ok(mut invocations) => {
                invocations.push(Invocation {
                    dir: dir.map(Path::to_path_buf),
                    program: program.to_string(),
                    args: args.to_vec(),
                    env: Vec::new(),
                });
                invocations.len() - 1
            }
            Err(_) => usize::MAX,
        };
        let script = self
            .scripts
            .lock()
            .ok()
            .and_then(|mut scripts| scripts.pop_front())
            .unwrap_or_else(|| Script::exit(0));
        Box::new(ScriptedProcess {
            script,
            log: Arc::clone(&self.invocations),
            index,
            stderr_mode: OutputMode::Inherit,
            started: false,
            killed: false,
        })
    }
}

struct ScriptedProcess {
    script: Script,
    log: Arc<Mutex<Vec<Invocation>>>,
    index: usize,
    stderr_mode: OutputMode,
    started: bool,
    killed: bool,
}

#[async_trait]
impl ProcessHandle for ScriptedProcess {
    fn set_stdout(&mut self, _mode: OutputMode) {}

    fn set_stderr(&mut self, mode: OutputMode) {
        self.stderr_mode = mode;
    }

    fn set_env(&mut self, key: &str, value: &str) {
        if let Ok(mut invocations) = self.log.lock()
            && let Some(invocation) = invocations.get_mut(self.index)
        {
            invocation.env.push((key.to_string(), value.to_string()));
        }
    }

    fn take_stderr(&mut self) -> Option<DiagnosticStream> {
        if !self.started || self.stderr_mode != OutputMode::Piped {
            return None;
        }
        if let Some(message) = self.script.stream_error.take() {
            return Some(Box::new(BufReader::new(FailingReader { message })));
        }
        let bytes = std::mem::take(&mut self.script.stderr);
        Some(Box::new(io::Cursor::new(bytes)))
    }

    async fn start(&mut self) -> io::Result<()> {
        self.started = true;
        Ok(())
    }

    async fn wait(&mut self) -> io::Result<ProcessExit> {
        if self.killed {
            return Ok(ProcessExit::signalled());
        }
        if self.script.hang {
            std::future::pending::<()>().await;
        }
        Ok(self.script.exit)
    }

    async fn kill(&mut self) -> io::Result<()> {
        self.killed = true;
        Ok(())
    }

    async fn combined_output(&mut self) -> io::Result<(ProcessExit, Vec<u8>)> {
        self.started = true;
        let exit = self.wait().await?;
        Ok((exit, std::mem::take(&mut self.script.stderr)))
    }
}

struct FailingReader {
    message: String,
}

impl AsyncRead for FailingReader {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Poll::Ready(Err(io::Error::other(self.message.clone())))
    }
}
