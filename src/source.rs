//! The line source and its callback-driven read loop.

use std::fmt;
use std::io::{BufRead, Read};
use std::path::Path;

use tracing::{debug, warn};

use crate::config::{DecodePolicy, SourceOptions};
use crate::error::{OpenError, ReadError};
use crate::io::command::CommandLine;
use crate::io::stream::Stream;

/// Spec that selects the process's standard input.
pub const STDIN_MARKER: &str = "-";
/// Trailing character that marks a spec as a command to read from.
pub const PIPE_MARKER: char = '|';

/// Which kind of stream a source reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// A regular file opened by path
    File,
    /// The process's standard input, or a reader standing in for it
    Stdin,
    /// The stdout of a spawned command
    Pipe,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::File => write!(f, "file"),
            SourceKind::Stdin => write!(f, "stdin"),
            SourceKind::Pipe => write!(f, "pipe"),
        }
    }
}

impl SourceKind {
    /// Classify a spec without opening anything.
    ///
    /// Surrounding whitespace is ignored.
    pub fn classify(spec: &str) -> Self {
        let spec = spec.trim();
        if spec == STDIN_MARKER {
            SourceKind::Stdin
        } else if spec.ends_with(PIPE_MARKER) {
            SourceKind::Pipe
        } else {
            SourceKind::File
        }
    }
}

/// Whether the callback wants more lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    #[default]
    /// Hand over the next line
    Continue,
    /// End the loop with `LoopOutcome::Interrupted`
    Stop,
}

impl From<bool> for Flow {
    fn from(keep_going: bool) -> Self {
        if keep_going { Flow::Continue } else { Flow::Stop }
    }
}

impl From<()> for Flow {
    fn from(_: ()) -> Self {
        Flow::Continue
    }
}

/// How a read loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopOutcome {
    /// The stream reached end of data
    Completed,
    /// The callback asked to stop before end of data
    Interrupted,
}

impl LoopOutcome {
    /// True when the loop ran to end of data.
    pub fn is_completed(&self) -> bool {
        matches!(self, LoopOutcome::Completed)
    }
}

/// What a callback can see of the source it is being fed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInfo {
    spec: String,
    kind: SourceKind,
}

impl SourceInfo {
    /// The spec as given to `open`, untrimmed.
    pub fn spec(&self) -> &str {
        &self.spec
    }

    /// Which kind of stream the lines come from.
    pub fn kind(&self) -> SourceKind {
        self.kind
    }
}

/// A file, stdin, or command output read one line at a time.
///
/// The stream is opened eagerly and released by [`LineSource::close`] or
/// when the value is dropped, whichever comes first. Releasing a pipe
/// source terminates the child and reaps it.
///
/// ```rust,no_run
/// use linesource::{LineSource, LoopOutcome, ReadError};
///
/// let mut src = LineSource::open("ls /etc |")?;
/// let mut names = Vec::new();
/// let outcome = src.run_loop(true, |_, line| {
///     names.push(line);
///     Ok::<_, ReadError>(true)
/// })?;
/// assert_eq!(outcome, LoopOutcome::Completed);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct LineSource {
    info: SourceInfo,
    decode: DecodePolicy,
    stream: Option<Stream>,
    lines_read: usize,
}

impl LineSource {
    /// Open a source with default options.
    pub fn open(spec: impl Into<String>) -> Result<Self, OpenError> {
        Self::open_with(spec, &SourceOptions::default())
    }

    /// Open a source.
    ///
    /// - `"-"` reads the process's standard input
    /// - `"<command> |"` runs the command and reads its stdout
    /// - anything else is a path to a file
    pub fn open_with(spec: impl Into<String>, options: &SourceOptions) -> Result<Self, OpenError> {
        let spec = spec.into();
        let trimmed = spec.trim();

        let stream = match SourceKind::classify(trimmed) {
            SourceKind::Stdin => Stream::stdin(),
            SourceKind::Pipe => {
                let cmd = &trimmed[..trimmed.len() - PIPE_MARKER.len_utf8()];
                let command = CommandLine::parse(cmd, &options.shell).map_err(|e| {
                    debug!(spec = %trimmed, error = %e, "cannot parse pipe command");
                    OpenError::pipe(trimmed, e)
                })?;
                Stream::spawn(&command, options).map_err(|e| {
                    debug!(spec = %trimmed, error = %e, "cannot spawn pipe command");
                    OpenError::pipe(trimmed, e)
                })?
            }
            SourceKind::File => Stream::open_file(Path::new(trimmed)).map_err(|e| {
                debug!(path = %trimmed, error = %e, "cannot open file source");
                OpenError::file(trimmed, e)
            })?,
        };

        debug!(spec = %trimmed, kind = %stream.kind(), "opened line source");
        Ok(Self::from_stream(spec, stream, options.decode))
    }

    /// Build a stdin-kind source over an arbitrary reader.
    ///
    /// Useful to inject stdin content in tests or when stdin has already
    /// been wrapped by the caller.
    pub fn from_stdin_reader<R: BufRead + Send + 'static>(reader: R) -> Self {
        Self::from_stream(
            STDIN_MARKER.to_string(),
            Stream::injected_stdin(reader),
            DecodePolicy::default(),
        )
    }

    fn from_stream(spec: String, stream: Stream, decode: DecodePolicy) -> Self {
        Self {
            info: SourceInfo {
                spec,
                kind: stream.kind(),
            },
            decode,
            stream: Some(stream),
            lines_read: 0,
        }
    }

    /// Change the decode policy for lines not read yet.
    pub fn with_decode_policy(mut self, policy: DecodePolicy) -> Self {
        self.decode = policy;
        self
    }

    /// The spec as given to `open`, untrimmed.
    pub fn spec(&self) -> &str {
        &self.info.spec
    }

    /// Which kind of stream this source reads.
    pub fn kind(&self) -> SourceKind {
        self.info.kind
    }

    /// Spec and kind, as handed to callbacks.
    pub fn info(&self) -> &SourceInfo {
        &self.info
    }

    /// False once the source has been closed.
    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Number of lines handed out so far.
    pub fn lines_read(&self) -> usize {
        self.lines_read
    }

    /// Process id of the child for pipe sources.
    pub fn child_id(&self) -> Option<u32> {
        self.stream.as_ref().and_then(Stream::child_id)
    }

    /// Direct access to the underlying stream, `None` once closed.
    ///
    /// Bytes read through this handle are not seen by the read loop.
    pub fn reader(&mut self) -> Option<&mut dyn Read> {
        self.stream.as_mut().map(Stream::reader)
    }

    /// Read the next line, with its delimiter, decoded as UTF-8.
    ///
    /// Returns `Ok(None)` at end of data or once closed.
    pub fn next_line(&mut self) -> Result<Option<String>, ReadError> {
        let Some(stream) = self.stream.as_mut() else {
            return Ok(None);
        };

        let mut bytes = Vec::new();
        let n = stream
            .read_line_bytes(&mut bytes)
            .map_err(|source| ReadError::Io {
                spec: self.info.spec.clone(),
                source,
            })?;
        if n == 0 {
            return Ok(None);
        }
        self.lines_read += 1;

        match String::from_utf8(bytes) {
            Ok(line) => Ok(Some(line)),
            Err(e) => match self.decode {
                DecodePolicy::Strict => Err(ReadError::Decode {
                    spec: self.info.spec.clone(),
                    line: self.lines_read,
                    source: e,
                }),
                DecodePolicy::Lossy => {
                    warn!(
                        spec = %self.info.spec,
                        line = self.lines_read,
                        "replacing invalid UTF-8"
                    );
                    Ok(Some(String::from_utf8_lossy(e.as_bytes()).into_owned()))
                }
            },
        }
    }

    /// Feed every line to `callback` until end of data or until it returns
    /// `false` / [`Flow::Stop`].
    ///
    /// With `strip` set, surrounding whitespace is trimmed from each line;
    /// otherwise the line keeps its trailing delimiter (see [`chop`]).
    pub fn run_loop<F, R, E>(&mut self, strip: bool, mut callback: F) -> Result<LoopOutcome, E>
    where
        F: FnMut(&SourceInfo, String) -> Result<R, E>,
        R: Into<Flow>,
        E: From<ReadError>,
    {
        self.run_loop_with(strip, &mut (), |info, line, _| callback(info, line))
    }

    /// Like [`run_loop`](Self::run_loop) with a context value handed to
    /// every callback invocation.
    ///
    /// Errors returned by the callback propagate unchanged; the stream stays
    /// owned by `self` and is released on drop.
    pub fn run_loop_with<C, F, R, E>(
        &mut self,
        strip: bool,
        ctx: &mut C,
        mut callback: F,
    ) -> Result<LoopOutcome, E>
    where
        C: ?Sized,
        F: FnMut(&SourceInfo, String, &mut C) -> Result<R, E>,
        R: Into<Flow>,
        E: From<ReadError>,
    {
        while let Some(line) = self.next_line()? {
            let line = if strip {
                line.trim().to_string()
            } else {
                line
            };

            let flow: Flow = callback(&self.info, line, ctx)?.into();
            if flow == Flow::Stop {
                debug!(spec = %self.info.spec, lines = self.lines_read, "read loop interrupted");
                return Ok(LoopOutcome::Interrupted);
            }
        }
        Ok(LoopOutcome::Completed)
    }

    /// Collect every remaining line.
    pub fn lines(&mut self, strip: bool) -> Result<Vec<String>, ReadError> {
        let mut lines = Vec::new();
        self.run_loop(strip, |_, line| {
            lines.push(line);
            Ok::<_, ReadError>(())
        })?;
        Ok(lines)
    }

    /// Release the stream. Safe to call more than once.
    pub fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            debug!(spec = %self.info.spec, kind = %self.info.kind, "closing line source");
            stream.release();
        }
    }
}

impl Drop for LineSource {
    fn drop(&mut self) {
        self.close();
    }
}

/// Remove the last character of `line`.
///
/// Meant to drop exactly one trailing `\n` while keeping other whitespace.
/// It does not look at what the character is: on a line without a
/// delimiter it removes real content (`chop("abc") == "ab"`).
pub fn chop(line: &str) -> &str {
    let mut chars = line.chars();
    chars.next_back();
    chars.as_str()
}
