// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared harness for the root suite: a disposable `--projects-root` /
//! `--engine-state-dir` layout plus a fluent wrapper over a finished
//! `kanbanctl` invocation.

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

pub const SPEC_WAIT_MAX_MS: u64 = 2_000;

/// Poll `check` until it returns `true` or `max_ms` elapses.
pub fn wait_for(max_ms: u64, mut check: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_millis(max_ms);
    loop {
        if check() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
}

/// A tempdir laid out as `<root>/projects/<project_id>/` (discoverable by
/// `MultiProjectProvider`) and `<root>/engine-state/` (the engine's own
/// operational state, separate from any project's workflow log).
pub struct Project {
    dir: tempfile::TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().expect("tempdir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn projects_root(&self) -> PathBuf {
        self.dir.path().join("projects")
    }

    pub fn engine_state_dir(&self) -> PathBuf {
        self.dir.path().join("engine-state")
    }

    /// Create `project_id`'s workspace directory so `MultiProjectProvider`
    /// can discover it, returning its path.
    pub fn project(&self, project_id: &str) -> PathBuf {
        let path = self.projects_root().join(project_id);
        std::fs::create_dir_all(&path).expect("create project dir");
        path
    }

    /// A `kanbanctl` invocation pre-wired to this layout's directories.
    pub fn kanbanctl(&self) -> Command {
        let mut cmd = Command::cargo_bin("kanbanctl").expect("kanbanctl binary");
        cmd.arg("--projects-root")
            .arg(self.projects_root())
            .arg("--engine-state-dir")
            .arg(self.engine_state_dir());
        cmd
    }
}

/// A finished process's output, with chained assertions in the style the
/// scheduler's own crate-level tests use for state assertions.
pub struct Ran {
    success: bool,
    stdout: String,
    stderr: String,
}

pub trait RunExt {
    fn run(self) -> Ran;
}

impl RunExt for Command {
    fn run(mut self) -> Ran {
        let output = self.output().expect("spawn kanbanctl");
        Ran {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

impl Ran {
    pub fn passes(self) -> Self {
        assert!(self.success, "expected success, stderr:\n{}", self.stderr);
        self
    }

    pub fn fails(self) -> Self {
        assert!(!self.success, "expected failure, stdout:\n{}", self.stdout);
        self
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(
            self.stdout.contains(needle),
            "stdout missing {needle:?}:\n{}",
            self.stdout
        );
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(
            self.stderr.contains(needle),
            "stderr missing {needle:?}:\n{}",
            self.stderr
        );
        self
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }
}
