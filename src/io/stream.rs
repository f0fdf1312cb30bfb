//! The byte stream owned by a line source, and its teardown.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use std::process::{Child, ChildStderr, ChildStdout, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use super::command::CommandLine;
use crate::config::SourceOptions;
use crate::source::SourceKind;

/// One open stream. Each variant carries exactly the resources of its kind.
pub(crate) enum Stream {
    File(BufReader<File>),
    Stdin(StdinStream),
    Pipe(PipeStream),
}

/// Standard input is borrowed, never closed here.
pub(crate) enum StdinStream {
    /// The process's stdin, locked for the duration of each line read
    Process(io::Stdin),
    /// A caller-supplied reader standing in for stdin
    Injected(Box<dyn BufRead + Send>),
}

impl std::fmt::Debug for Stream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stream::File(_) => f.write_str("Stream::File"),
            Stream::Stdin(_) => f.write_str("Stream::Stdin"),
            Stream::Pipe(p) => f
                .debug_struct("Stream::Pipe")
                .field("pid", &p.child.id())
                .finish(),
        }
    }
}

impl Stream {
    pub(crate) fn open_file(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        // File::open succeeds on directories; reading would fail later.
        if file.metadata()?.is_dir() {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "is a directory"));
        }
        Ok(Stream::File(BufReader::new(file)))
    }

    pub(crate) fn stdin() -> Self {
        Stream::Stdin(StdinStream::Process(io::stdin()))
    }

    pub(crate) fn injected_stdin<R: BufRead + Send + 'static>(reader: R) -> Self {
        Stream::Stdin(StdinStream::Injected(Box::new(reader)))
    }

    pub(crate) fn spawn(command: &CommandLine, options: &SourceOptions) -> io::Result<Self> {
        let mut cmd = command.to_command();
        cmd.stdin(Stdio::inherit()).stdout(Stdio::piped());
        if options.capture_stderr {
            cmd.stderr(Stdio::piped());
        } else {
            cmd.stderr(Stdio::null());
        }

        // Own process group so a shell pipeline is terminated as a whole.
        // Not with a terminal on stdin by default: a background group
        // reading the tty is stopped by SIGTTIN.
        #[cfg(unix)]
        let grouped = {
            use std::io::IsTerminal;
            use std::os::unix::process::CommandExt;

            use crate::config::ProcessGroup;

            let grouped = match options.process_group {
                ProcessGroup::Always => true,
                ProcessGroup::Never => false,
                ProcessGroup::Auto => !io::stdin().is_terminal(),
            };
            if grouped {
                cmd.process_group(0);
            }
            grouped
        };
        #[cfg(not(unix))]
        let grouped = {
            let _ = options.process_group;
            false
        };

        let mut child = cmd.spawn()?;
        let stdout = match child.stdout.take() {
            Some(stdout) => stdout,
            None => {
                abandon(&mut child);
                return Err(io::Error::other("child stdout was not captured"));
            }
        };
        let stderr = match child.stderr.take().map(StderrDrain::start).transpose() {
            Ok(drain) => drain,
            Err(e) => {
                abandon(&mut child);
                return Err(e);
            }
        };
        debug!(
            pid = child.id(),
            grouped,
            command = %command.display(),
            "spawned pipe source"
        );

        Ok(Stream::Pipe(PipeStream {
            stdout: BufReader::new(stdout),
            child,
            grouped,
            stderr,
        }))
    }

    pub(crate) fn kind(&self) -> SourceKind {
        match self {
            Stream::File(_) => SourceKind::File,
            Stream::Stdin(_) => SourceKind::Stdin,
            Stream::Pipe(_) => SourceKind::Pipe,
        }
    }

    /// Append bytes up to and including the next `\n` to `buf`.
    pub(crate) fn read_line_bytes(&mut self, buf: &mut Vec<u8>) -> io::Result<usize> {
        match self {
            Stream::File(r) => r.read_until(b'\n', buf),
            Stream::Stdin(StdinStream::Process(stdin)) => stdin.lock().read_until(b'\n', buf),
            Stream::Stdin(StdinStream::Injected(r)) => r.read_until(b'\n', buf),
            Stream::Pipe(p) => p.stdout.read_until(b'\n', buf),
        }
    }

    pub(crate) fn reader(&mut self) -> &mut dyn Read {
        match self {
            Stream::File(r) => r,
            Stream::Stdin(StdinStream::Process(stdin)) => stdin,
            Stream::Stdin(StdinStream::Injected(r)) => r,
            Stream::Pipe(p) => &mut p.stdout,
        }
    }

    pub(crate) fn child_id(&self) -> Option<u32> {
        match self {
            Stream::Pipe(p) => Some(p.child.id()),
            _ => None,
        }
    }

    /// Release the stream: close the file, drop the stdin handle, or
    /// terminate and reap the child.
    pub(crate) fn release(self) {
        match self {
            Stream::File(file) => drop(file),
            // Only our handle goes away; fd 0 stays open.
            Stream::Stdin(stdin) => drop(stdin),
            Stream::Pipe(pipe) => pipe.terminate(),
        }
    }
}

pub(crate) struct PipeStream {
    stdout: BufReader<ChildStdout>,
    child: Child,
    /// The child leads its own process group
    grouped: bool,
    stderr: Option<StderrDrain>,
}

impl PipeStream {
    fn terminate(self) {
        let PipeStream {
            stdout,
            mut child,
            grouped,
            stderr,
        } = self;
        let pid = child.id();
        drop(stdout);

        match child.try_wait() {
            Ok(Some(status)) => debug!(pid, %status, "pipe child already exited"),
            Ok(None) => send_terminate(&mut child, grouped),
            Err(e) => warn!(pid, error = %e, "cannot poll pipe child"),
        }

        match child.wait() {
            Ok(status) => debug!(pid, %status, "reaped pipe child"),
            Err(e) => warn!(pid, error = %e, "failed to reap pipe child"),
        }

        if let Some(drain) = stderr {
            drain.finish(pid);
        }
    }
}

fn abandon(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// How long teardown waits for the stderr reader after the child is reaped.
const STDERR_DRAIN_TIMEOUT: Duration = Duration::from_millis(500);
/// Only the tail of the child's stderr is kept for logging.
const STDERR_KEEP_BYTES: usize = 16 * 1024;

/// Reads a child's stderr on its own thread so the child never blocks on a
/// full pipe while stdout is being consumed.
struct StderrDrain {
    rx: mpsc::Receiver<io::Result<Vec<u8>>>,
}

impl StderrDrain {
    fn start(mut stderr: ChildStderr) -> io::Result<Self> {
        let (tx, rx) = mpsc::sync_channel(1);
        thread::Builder::new()
            .name("linesource-stderr".into())
            .spawn(move || {
                let _ = tx.send(read_tail(&mut stderr, STDERR_KEEP_BYTES));
            })?;
        Ok(Self { rx })
    }

    /// Log what the child wrote. Gives up after a short wait: a process
    /// outside our reach may still hold the write end open.
    fn finish(self, pid: u32) {
        match self.rx.recv_timeout(STDERR_DRAIN_TIMEOUT) {
            Ok(Ok(buf)) if buf.is_empty() => {}
            Ok(Ok(buf)) => debug!(
                pid,
                stderr = %String::from_utf8_lossy(&buf).trim_end(),
                "pipe child stderr"
            ),
            Ok(Err(e)) => debug!(pid, error = %e, "cannot drain pipe child stderr"),
            Err(_) => debug!(pid, "pipe child stderr still open, detaching reader"),
        }
    }
}

/// Read `reader` to the end, keeping at most the last `keep` bytes.
pub(crate) fn read_tail<R: Read>(reader: &mut R, keep: usize) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];
    loop {
        let n = match reader.read(&mut chunk) {
            Ok(0) => return Ok(buf),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        buf.extend_from_slice(&chunk[..n]);
        if buf.len() > keep {
            let excess = buf.len() - keep;
            buf.drain(..excess);
        }
    }
}

#[cfg(unix)]
fn send_terminate(child: &mut Child, grouped: bool) {
    use nix::sys::signal::{self, Signal};
    use nix::unistd::Pid;

    let pid = child.id();
    if grouped {
        // Negative pid addresses the whole process group led by the child.
        sigterm(pid, Pid::from_raw(-(pid as i32)));
        return;
    }

    // Outside a group, find what the child started before it dies and
    // its children are reparented.
    let descendants = descendants_of(pid);
    sigterm(pid, Pid::from_raw(pid as i32));
    for descendant in descendants {
        sigterm(pid, Pid::from_raw(descendant as i32));
    }

    fn sigterm(pid: u32, target: Pid) {
        if let Err(e) = signal::kill(target, Signal::SIGTERM) {
            // ESRCH: the target has already exited.
            if e != nix::errno::Errno::ESRCH {
                warn!(pid, %target, error = %e, "failed to send SIGTERM to pipe child");
            }
        }
    }
}

/// Every process below `root` in the process tree.
#[cfg(unix)]
fn descendants_of(root: u32) -> Vec<u32> {
    use sysinfo::{ProcessesToUpdate, System};

    let mut sys = System::new();
    sys.refresh_processes(ProcessesToUpdate::All, true);

    let mut found = Vec::new();
    let mut frontier = vec![root];
    while let Some(parent) = frontier.pop() {
        for (pid, process) in sys.processes() {
            // Linux lists threads as tasks; only whole processes matter here.
            if process.thread_kind().is_some() {
                continue;
            }
            let pid = pid.as_u32();
            if process.parent().map(|p| p.as_u32()) == Some(parent) && !found.contains(&pid) {
                found.push(pid);
                frontier.push(pid);
            }
        }
    }
    found
}

#[cfg(not(unix))]
fn send_terminate(child: &mut Child, _grouped: bool) {
    if let Err(e) = child.kill() {
        warn!(pid = child.id(), error = %e, "failed to terminate pipe child");
    }
}
