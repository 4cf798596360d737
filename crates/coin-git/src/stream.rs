use std::io::{BufRead, BufReader, Read};
use std::process::{Child, ChildStdout, Command, Stdio};
use std::thread::{self, JoinHandle};

use coin_ledger::HistoryError;
use tracing::debug;

/// Line-by-line stdout of a running git command.
///
/// Lines are yielded as they arrive while stderr is drained on a helper
/// thread, so a chatty child cannot fill its stderr pipe and stall. Once
/// stdout reaches EOF the child is reaped and a non-zero exit is reported as
/// a final [`HistoryError::CommandFailed`]. Dropping the stream early kills
/// the child.
pub struct LogStream {
    description: String,
    child: Option<Child>,
    stdout: Option<BufReader<ChildStdout>>,
    stderr: Option<JoinHandle<std::io::Result<String>>>,
}

impl LogStream {
    /// Spawn `command` with piped output.
    pub fn spawn(mut command: Command, description: String) -> Result<Self, HistoryError> {
        debug!(command = %description, "spawning");
        let mut child = command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;
        let stdout = child
            .stdout
            .take()
            .map(BufReader::new)
            .ok_or_else(|| HistoryError::Backend(format!("`{description}` has no stdout")))?;
        let stderr = child.stderr.take().map(|mut pipe| {
            thread::spawn(move || {
                let mut text = String::new();
                pipe.read_to_string(&mut text).map(|_| text)
            })
        });

        Ok(Self {
            description,
            child: Some(child),
            stdout: Some(stdout),
            stderr,
        })
    }

    fn finish(&mut self) -> Result<(), HistoryError> {
        self.stdout = None;
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        let status = child.wait()?;
        let stderr = match self.stderr.take() {
            Some(reader) => reader
                .join()
                .map_err(|_| HistoryError::Backend("stderr reader panicked".into()))??,
            None => String::new(),
        };
        if status.success() {
            Ok(())
        } else {
            Err(HistoryError::CommandFailed {
                command: self.description.clone(),
                status: status.to_string(),
                stderr: stderr.trim().to_string(),
            })
        }
    }
}

impl Iterator for LogStream {
    type Item = Result<String, HistoryError>;

    fn next(&mut self) -> Option<Self::Item> {
        let stdout = self.stdout.as_mut()?;
        let mut buf = Vec::new();
        match stdout.read_until(b'\n', &mut buf) {
            Ok(0) => self.finish().err().map(Err),
            Ok(_) => {
                while matches!(buf.last(), Some(b'\n' | b'\r')) {
                    buf.pop();
                }
                Some(Ok(String::from_utf8_lossy(&buf).into_owned()))
            }
            Err(e) => {
                self.stdout = None;
                Some(Err(e.into()))
            }
        }
    }
}

impl Drop for LogStream {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}
