//! Default directory resolution when `--projects-root` / `--engine-state-dir`
//! are omitted, exercised through the real binary against a fake `$HOME`.

use assert_cmd::Command;

/// Mutates `HOME`/`XDG_STATE_HOME` for the test process itself (to compute
/// the expected path via the same `dirs` crate the binary uses) in addition
/// to the child's environment, so this must run alone.
#[test]
#[serial_test::serial]
fn status_without_flags_uses_xdg_state_dir_under_home() {
    let home = tempfile::tempdir().unwrap();

    let prev_home = std::env::var_os("HOME");
    let prev_xdg = std::env::var_os("XDG_STATE_HOME");
    std::env::set_var("HOME", home.path());
    std::env::remove_var("XDG_STATE_HOME");
    let expected_engine_dir = dirs::state_dir()
        .expect("HOME is set")
        .join("kanban")
        .join("engine");
    if let Some(home) = prev_home {
        std::env::set_var("HOME", home);
    }
    if let Some(xdg) = prev_xdg {
        std::env::set_var("XDG_STATE_HOME", xdg);
    }

    let output = Command::cargo_bin("kanbanctl")
        .unwrap()
        .env("HOME", home.path())
        .env_remove("XDG_STATE_HOME")
        .args(["enable"])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let expected = expected_engine_dir.join("engine_state.json");
    assert!(expected.exists(), "expected engine state at {}", expected.display());
}
