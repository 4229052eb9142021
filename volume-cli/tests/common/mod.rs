use assert_cmd::Command;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

/// A `boxvol` invocation bound to a throwaway home directory.
pub struct TestContext {
    pub cmd: Command,
    pub home: TempDir,
}

impl TestContext {
    /// Another command sharing this context's home.
    pub fn new_cmd(&self) -> Command {
        command(self.home.path())
    }

    /// Run `create` and return the printed name.
    #[allow(dead_code)]
    pub fn create(&self, args: &[&str]) -> String {
        let output = self
            .new_cmd()
            .arg("create")
            .args(args)
            .assert()
            .success()
            .get_output()
            .clone();
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }
}

fn command(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_boxvol"));
    cmd.timeout(Duration::from_secs(30));
    cmd.env_remove("BOXLITE_HOME");
    cmd.env_remove("RUST_LOG");
    cmd.arg("--home").arg(home);
    cmd
}

pub fn boxvol() -> TestContext {
    let home = TempDir::new().expect("Failed to create test home");
    TestContext {
        cmd: command(home.path()),
        home,
    }
}
