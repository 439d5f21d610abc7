use crate::{Config, Error, Result};
use std::process::{ExitStatus, Stdio};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

/// Server child process owned by the driver for the whole run.
///
/// The child is killed if this handle is dropped without [`ServerProcess::terminate`].
pub struct ServerProcess {
    child: Child,
}

impl ServerProcess {
    pub fn spawn(config: &Config) -> Result<Self> {
        let mut cmd = Command::new(&config.server_path);
        cmd.args(&config.server_args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            // piped but never drained
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|source| Error::Spawn {
            path: config.server_path.display().to_string(),
            source,
        })?;
        tracing::debug!(pid = ?child.id(), path = %config.server_path.display(), "spawned server");

        Ok(Self { child })
    }

    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Takes the child's output and input pipes.
    pub fn take_pipes(&mut self) -> Result<(ChildStdout, ChildStdin)> {
        let stdout = self.child.stdout.take().ok_or(Error::MissingPipe("stdout"))?;
        let stdin = self.child.stdin.take().ok_or(Error::MissingPipe("stdin"))?;
        Ok((stdout, stdin))
    }

    /// Signals the child to stop and waits for it to exit.
    pub async fn terminate(mut self) -> Result<ExitStatus> {
        if let Err(err) = self.child.start_kill() {
            // Already exited; wait still reaps it
            tracing::debug!(error = %err, "kill signal not delivered");
        }
        let status = self.child.wait().await?;
        tracing::debug!(%status, "server exited");
        Ok(status)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::process::ExitStatusExt;
    use tokio::test;

    #[test]
    async fn terminate_kills_running_child() {
        let config = Config::default()
            .with_server("/bin/sh")
            .with_server_args(["-c", "exec sleep 30"]);
        let mut server = ServerProcess::spawn(&config).unwrap();
        assert!(server.id().is_some());
        server.take_pipes().unwrap();

        let status = server.terminate().await.unwrap();
        assert_eq!(status.signal(), Some(9));
    }

    #[test]
    async fn terminate_reaps_exited_child() {
        let config = Config::default()
            .with_server("/bin/sh")
            .with_server_args(["-c", "exit 3"]);
        let server = ServerProcess::spawn(&config).unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;

        let status = server.terminate().await.unwrap();
        assert!(!status.success());
    }

    #[test]
    async fn pipes_can_only_be_taken_once() {
        let config = Config::default()
            .with_server("/bin/sh")
            .with_server_args(["-c", "exec sleep 30"]);
        let mut server = ServerProcess::spawn(&config).unwrap();
        server.take_pipes().unwrap();
        assert!(matches!(server.take_pipes(), Err(Error::MissingPipe("stdout"))));
        server.terminate().await.unwrap();
    }

    #[test]
    async fn missing_binary_reports_path() {
        let config = Config::default().with_server("/nonexistent/elicitation-server");
        let err = ServerProcess::spawn(&config).err().unwrap();
        assert!(err.to_string().contains("/nonexistent/elicitation-server"));
    }
}
