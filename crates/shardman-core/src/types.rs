//! Shared data model for the shard fleet.

use std::fmt;
use std::str::FromStr;

use crate::error::ShardmanError;

/// The shard that owns the cluster console and chat log.
pub const MASTER_SHARD: &str = "Master";

/// A single managed server shard as observed at one poll.
///
/// Instances are rebuilt from scratch on every status poll; nothing mutates
/// a `Shard` in place after construction. The UI always holds a complete
/// snapshot (`Vec<Shard>`) that is replaced wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shard {
    /// Shard name, unique within the fleet (e.g. "Master", "Caves").
    pub name: String,
    /// Whether the supervisor reports the shard's unit as active.
    pub is_running: bool,
    /// Whether autostart is enabled for the shard's unit.
    pub is_enabled: bool,
}

impl Shard {
    /// Create a shard record with both flags cleared.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_running: false,
            is_enabled: false,
        }
    }
}

impl fmt::Display for Shard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} running={} enabled={}",
            self.name, self.is_running, self.is_enabled
        )
    }
}

/// A mutating action that can be applied to a shard's unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShardAction {
    Start,
    Stop,
    Restart,
    Enable,
    Disable,
}

impl ShardAction {
    /// The systemctl verb for this action.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShardAction::Start => "start",
            ShardAction::Stop => "stop",
            ShardAction::Restart => "restart",
            ShardAction::Enable => "enable",
            ShardAction::Disable => "disable",
        }
    }
}

impl fmt::Display for ShardAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShardAction {
    type Err = ShardmanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(ShardAction::Start),
            "stop" => Ok(ShardAction::Stop),
            "restart" => Ok(ShardAction::Restart),
            "enable" => Ok(ShardAction::Enable),
            "disable" => Ok(ShardAction::Disable),
            other => Err(ShardmanError::internal(format!(
                "unknown shard action: {other}"
            ))),
        }
    }
}

/// Captured result of one external command invocation.
///
/// Adapters never surface a failed command as an `Err`; the exit status and
/// captured streams travel together so callers can decide what to show.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Whether the command exited with status zero.
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// A successful invocation with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed invocation described only by a diagnostic message.
    pub fn failed(stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// A short human-readable line for status displays.
    pub fn summary(&self) -> String {
        if self.success {
            "ok".to_string()
        } else if self.stderr.is_empty() {
            "failed".to_string()
        } else {
            // First line of stderr is usually the interesting part.
            let first = self.stderr.lines().next().unwrap_or("failed");
            format!("failed: {first}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shard_new_defaults() {
        let shard = Shard::new("Master");
        assert_eq!(shard.name, "Master");
        assert!(!shard.is_running);
        assert!(!shard.is_enabled);
    }

    #[test]
    fn test_shard_display() {
        let mut shard = Shard::new("Caves");
        shard.is_enabled = true;
        assert_eq!(shard.to_string(), "Caves running=false enabled=true");
    }

    #[test]
    fn test_action_round_trip() {
        for action in [
            ShardAction::Start,
            ShardAction::Stop,
            ShardAction::Restart,
            ShardAction::Enable,
            ShardAction::Disable,
        ] {
            assert_eq!(action.as_str().parse::<ShardAction>().unwrap(), action);
        }
    }

    #[test]
    fn test_action_parse_rejects_unknown() {
        assert!("explode".parse::<ShardAction>().is_err());
    }

    #[test]
    fn test_output_summary() {
        assert_eq!(CommandOutput::ok("done").summary(), "ok");
        assert_eq!(CommandOutput::failed("").summary(), "failed");
        assert_eq!(
            CommandOutput::failed("unit not found\ndetails").summary(),
            "failed: unit not found"
        );
    }
}
