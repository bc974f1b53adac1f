use std::path::{Path, PathBuf};
use std::process::Stdio;

use thiserror::Error;
use tokio::process::{Child, Command};

use droidtail_types::DeviceInfo;

/// Errors from the adb boundary. Everything here is reportable to the user;
/// recoverable conditions (short lines, dead processes) never reach this
/// type.
#[derive(Debug, Error)]
pub enum AdbError {
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("adb exited with {status}: {stderr}")]
    CommandFailed {
        status: std::process::ExitStatus,
        stderr: String,
    },
}

/// Wrapper around the adb binary
#[derive(Clone, Debug)]
pub struct AdbClient {
    adb_path: PathBuf,
}

impl AdbClient {
    /// Create a client with an explicit adb path, or fall back to the
    /// Android SDK environment variables and finally to `adb` on PATH.
    pub fn new(adb_path: Option<PathBuf>) -> Self {
        let adb_path = adb_path.unwrap_or_else(Self::locate_adb);
        tracing::debug!(path = %adb_path.display(), "using adb binary");
        Self { adb_path }
    }

    fn locate_adb() -> PathBuf {
        for var in ["ANDROID_SDK_ROOT", "ANDROID_HOME"] {
            if let Ok(root) = std::env::var(var) {
                let candidate = Path::new(&root).join("platform-tools").join("adb");
                if candidate.exists() {
                    return candidate;
                }
            }
        }
        PathBuf::from("adb")
    }

    /// The resolved adb binary path
    pub fn path(&self) -> &Path {
        &self.adb_path
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.adb_path);
        cmd.stdin(Stdio::null());
        cmd
    }

    fn spawn_error(&self, source: std::io::Error) -> AdbError {
        AdbError::Spawn {
            program: self.adb_path.display().to_string(),
            source,
        }
    }

    /// Enumerate connected devices via `adb devices -l`
    pub async fn devices(&self) -> Result<Vec<DeviceInfo>, AdbError> {
        let output = self
            .command()
            .args(["devices", "-l"])
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            return Err(AdbError::CommandFailed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let devices: Vec<DeviceInfo> = stdout
            .lines()
            .filter(|line| line.len() > 2)
            .filter_map(DeviceInfo::parse)
            .collect();

        tracing::debug!(count = devices.len(), "enumerated devices");
        Ok(devices)
    }

    /// Spawn `adb [-s <id>] logcat -v tag` with piped stdout/stderr.
    /// The caller owns the child; this is the one operation whose failure
    /// is surfaced rather than swallowed.
    pub fn spawn_logcat(&self, device_id: &str) -> Result<Child, AdbError> {
        let mut cmd = self.command();
        if !device_id.is_empty() {
            cmd.args(["-s", device_id]);
        }
        cmd.args(["logcat", "-v", "tag"])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        cmd.spawn().map_err(|e| self.spawn_error(e))
    }

    /// Clear the device-side log via `adb logcat -c`
    pub async fn clear_log(&self, device_id: &str) -> Result<(), AdbError> {
        let mut cmd = self.command();
        if !device_id.is_empty() {
            cmd.args(["-s", device_id]);
        }
        let output = cmd
            .args(["logcat", "-c"])
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            return Err(AdbError::CommandFailed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(())
    }
}
