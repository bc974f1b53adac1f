use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use droidtail_adb::{AdbClient, AdbError};

use crate::buffer::LogBuffer;

/// Owns the logcat child process and the reader tasks feeding the buffer.
///
/// Stdout and stderr are independent producer contexts; both funnel into
/// the same thread-safe `ingest` entry point, so relative order between the
/// two streams is arrival order at the staging lock.
pub struct LogcatStream {
    cancel: CancellationToken,
    child: Option<Child>,
    tasks: Vec<JoinHandle<()>>,
}

impl LogcatStream {
    pub fn new() -> Self {
        Self {
            cancel: CancellationToken::new(),
            child: None,
            tasks: Vec::new(),
        }
    }

    /// Start capturing from the given device (empty id = default target).
    /// Any previous capture is stopped first. Failure to launch adb is the
    /// one error this layer reports.
    pub async fn start(
        &mut self,
        client: &AdbClient,
        device_id: &str,
        buffer: LogBuffer,
    ) -> Result<(), AdbError> {
        self.stop().await;

        let mut child = client.spawn_logcat(device_id)?;
        tracing::debug!(device = device_id, "logcat capture started");

        // Fresh token; the previous one stays cancelled for the old tasks
        self.cancel = CancellationToken::new();

        if let Some(stdout) = child.stdout.take() {
            self.tasks
                .push(self.spawn_reader(stdout, buffer.clone(), "stdout"));
        }
        if let Some(stderr) = child.stderr.take() {
            self.tasks
                .push(self.spawn_reader(stderr, buffer, "stderr"));
        }

        self.child = Some(child);
        Ok(())
    }

    fn spawn_reader<R>(
        &self,
        reader: R,
        buffer: LogBuffer,
        stream_name: &'static str,
    ) -> JoinHandle<()>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let cancel = self.cancel.clone();

        tokio::spawn(async move {
            let mut lines = BufReader::new(reader).lines();

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,

                    result = lines.next_line() => match result {
                        Ok(Some(line)) => buffer.ingest(&line),
                        Ok(None) => {
                            // Process exited or closed the stream
                            tracing::debug!(stream = stream_name, "logcat stream ended");
                            break;
                        }
                        Err(err) => {
                            tracing::warn!(stream = stream_name, %err, "error reading logcat output");
                            break;
                        }
                    }
                }
            }
        })
    }

    /// Stop the capture and wait for both reader tasks to finish.
    /// Once this returns no producer touches the buffer again, so the
    /// caller may reset it without racing a stale line from the old
    /// session. Idempotent: stopping a never-started or already-exited
    /// capture is a no-op, never an error.
    pub async fn stop(&mut self) {
        self.cancel.cancel();
        if let Some(mut child) = self.child.take() {
            // Killing a child that already exited fails; just ignore it
            let _ = child.start_kill();
        }
        for task in self.tasks.drain(..) {
            // An aborted task can still be mid-poll on another worker;
            // joining it is what makes the quiescence guarantee hold
            task.abort();
            let _ = task.await;
        }
    }

    /// Whether a capture session is active
    pub fn is_running(&self) -> bool {
        self.child.is_some()
    }
}

impl Default for LogcatStream {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for LogcatStream {
    fn drop(&mut self) {
        // Best-effort sync cleanup; callers wanting the quiescence
        // guarantee go through `stop`
        self.cancel.cancel();
        if let Some(mut child) = self.child.take() {
            let _ = child.start_kill();
        }
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    #[tokio::test]
    async fn test_stop_before_start_is_a_noop() {
        let mut stream = LogcatStream::new();
        stream.stop().await;
        stream.stop().await;
        assert!(!stream.is_running());
    }

    #[tokio::test]
    async fn test_start_failure_is_surfaced() {
        let client = AdbClient::new(Some(PathBuf::from("/nonexistent/adb")));
        let mut stream = LogcatStream::new();
        let result = stream.start(&client, "", LogBuffer::new(10)).await;
        assert!(matches!(result, Err(AdbError::Spawn { .. })));
        assert!(!stream.is_running());
    }

    #[tokio::test]
    async fn test_reader_task_feeds_buffer() {
        // `echo` stands in for adb: it prints its arguments once and exits,
        // so the stdout reader ingests exactly one line.
        let client = AdbClient::new(Some(PathBuf::from("/bin/echo")));
        let buffer = LogBuffer::new(10);
        let mut stream = LogcatStream::new();
        stream.start(&client, "", buffer.clone()).await.unwrap();

        for _ in 0..50 {
            if buffer.staged_len() > 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(buffer.staged_len(), 1);

        stream.stop().await;
        stream.stop().await;
        assert!(!stream.is_running());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_stop_quiesces_producers_before_reset() {
        // `yes` echoes its argv forever, so the reader stages lines
        // continuously until stopped.
        let client = AdbClient::new(Some(PathBuf::from("/usr/bin/yes")));
        let buffer = LogBuffer::new(10);
        let mut stream = LogcatStream::new();
        stream.start(&client, "", buffer.clone()).await.unwrap();

        for _ in 0..50 {
            if buffer.staged_len() > 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert!(buffer.staged_len() > 0);

        // Once stop returns the reader tasks are joined, so a reset
        // afterwards can never observe a late line from the old session
        stream.stop().await;
        buffer.reset();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(buffer.staged_len(), 0);
        assert!(!stream.is_running());
    }
}
