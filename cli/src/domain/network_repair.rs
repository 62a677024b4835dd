//! Host network repair plans.
//!
//! Each platform has a fixed, ordered list of independent commands. Every
//! entry is attempted; a failure never prevents the next one from running.

use serde::Serialize;

/// Host platform family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Unix,
}

impl Platform {
    /// Platform of the running binary.
    #[must_use]
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Unix
        }
    }
}

/// A single best-effort repair command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepairStep {
    pub description: &'static str,
    pub program: &'static str,
    pub args: &'static [&'static str],
}

const WINDOWS_STEPS: &[RepairStep] = &[
    RepairStep {
        description: "Restarting Docker Desktop",
        program: "powershell",
        args: &["-Command", "Restart-Service docker"],
    },
    RepairStep {
        description: "Flushing DNS cache",
        program: "powershell",
        args: &["-Command", "Clear-DnsClientCache"],
    },
    RepairStep {
        description: "Resetting Winsock",
        program: "powershell",
        args: &["-Command", "netsh winsock reset"],
    },
];

const UNIX_STEPS: &[RepairStep] = &[
    RepairStep {
        description: "Restarting Docker service",
        program: "sudo",
        args: &["systemctl", "restart", "docker"],
    },
    RepairStep {
        description: "Flushing iptables",
        program: "sudo",
        args: &["iptables", "-F"],
    },
];

/// Ordered repair steps for `platform`.
#[must_use]
pub fn repair_plan(platform: Platform) -> &'static [RepairStep] {
    match platform {
        Platform::Windows => WINDOWS_STEPS,
        Platform::Unix => UNIX_STEPS,
    }
}

/// Which steps succeeded and which failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepairReport {
    pub succeeded: Vec<&'static str>,
    pub failed: Vec<&'static str>,
}

impl RepairReport {
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}
