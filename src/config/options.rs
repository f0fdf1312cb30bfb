//! Source options.

use serde::Deserialize;

/// Policy for lines that are not valid UTF-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodePolicy {
    #[default]
    /// Fail the read loop with `ReadError::Decode`
    Strict,
    /// Replace invalid sequences with U+FFFD and keep going
    Lossy,
}

impl DecodePolicy {
    /// Parse a policy from a string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Some(DecodePolicy::Strict),
            "lossy" => Some(DecodePolicy::Lossy),
            _ => None,
        }
    }
}

/// Whether a pipe child runs in its own process group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessGroup {
    #[default]
    /// Own group unless stdin is a terminal
    Auto,
    /// Always start a new group; teardown signals the whole group
    Always,
    /// Stay in the caller's group; teardown signals the child and its descendants
    Never,
}

impl ProcessGroup {
    /// Parse a mode from a string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Some(ProcessGroup::Auto),
            "always" => Some(ProcessGroup::Always),
            "never" => Some(ProcessGroup::Never),
            _ => None,
        }
    }
}

/// Options applied by `LineSource::open_with`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SourceOptions {
    /// Shell used to run commands containing shell metacharacters
    pub shell: String,
    /// Decoding policy for every source kind
    pub decode: DecodePolicy,
    /// Capture the child's stderr instead of discarding it
    pub capture_stderr: bool,
    /// Process group placement of pipe children
    pub process_group: ProcessGroup,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            shell: "sh".into(),
            decode: DecodePolicy::default(),
            capture_stderr: true,
            process_group: ProcessGroup::default(),
        }
    }
}

impl SourceOptions {
    /// Create options with the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shell used for metacharacter commands.
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    /// Set the decode policy.
    pub fn with_decode_policy(mut self, policy: DecodePolicy) -> Self {
        self.decode = policy;
        self
    }

    /// Capture or discard the child's stderr.
    pub fn with_capture_stderr(mut self, capture: bool) -> Self {
        self.capture_stderr = capture;
        self
    }

    /// Set the process group placement of pipe children.
    pub fn with_process_group(mut self, mode: ProcessGroup) -> Self {
        self.process_group = mode;
        self
    }
}
