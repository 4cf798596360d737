use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use coin_ledger::{CommitWriter, HistoryError, HistoryReader, Identity, Lines, TAG};
use tracing::debug;

use crate::stream::LogStream;

const AUTHOR_FORMAT: &str = "--pretty=format:%an <%ae>";

/// A git working tree, driven through the `git` binary.
#[derive(Clone, Debug)]
pub struct GitRepository {
    workdir: PathBuf,
    binary: PathBuf,
}

impl GitRepository {
    /// Use the repository containing `workdir`.
    pub fn open(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            binary: PathBuf::from("git"),
        }
    }

    /// Use a specific git executable instead of `git` from `PATH`.
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn command<S: AsRef<OsStr>>(&self, args: &[S]) -> Command {
        let mut command = Command::new(&self.binary);
        command.current_dir(&self.workdir).args(args);
        command
    }

    fn describe<S: AsRef<OsStr>>(&self, args: &[S]) -> String {
        let mut description = self.binary.display().to_string();
        for arg in args {
            description.push(' ');
            description.push_str(&arg.as_ref().to_string_lossy());
        }
        description
    }

    fn stream<S: AsRef<OsStr>>(&self, args: &[S]) -> Result<LogStream, HistoryError> {
        LogStream::spawn(self.command(args), self.describe(args))
    }

    /// Run to completion, whatever the exit status.
    fn output<S: AsRef<OsStr>>(&self, args: &[S]) -> Result<Output, HistoryError> {
        debug!(command = %self.describe(args), "running");
        Ok(self.command(args).stdin(Stdio::null()).output()?)
    }

    fn failure<S: AsRef<OsStr>>(&self, args: &[S], output: &Output) -> HistoryError {
        HistoryError::CommandFailed {
            command: self.describe(args),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }

    /// `git config <key>`; exit status 1 means the key is unset.
    fn config_value(&self, key: &str) -> Result<Option<String>, HistoryError> {
        let args = ["config", key];
        let output = self.output(&args)?;
        match output.status.code() {
            Some(0) => {
                let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
                Ok((!value.is_empty()).then_some(value))
            }
            Some(1) => Ok(None),
            _ => Err(self.failure(&args, &output)),
        }
    }
}

impl HistoryReader for GitRepository {
    fn authors(&self) -> Result<Lines<'_>, HistoryError> {
        Ok(Box::new(self.stream(&["log", AUTHOR_FORMAT])?))
    }

    fn transaction_lines(&self) -> Result<Lines<'_>, HistoryError> {
        let grep = format!("--grep=^{TAG}");
        Ok(Box::new(self.stream(&[
            "log",
            grep.as_str(),
            "--pretty=format:%an <%ae> - %s",
        ])?))
    }

    fn find_author(&self, query: &str) -> Result<Option<Identity>, HistoryError> {
        let author = format!("--author={query}");
        let args = ["log", "-F", "-i", "-1", AUTHOR_FORMAT, author.as_str()];
        let output = self.output(&args)?;
        if !output.status.success() {
            return Err(self.failure(&args, &output));
        }
        let found = Identity::new(String::from_utf8_lossy(&output.stdout));
        Ok((!found.is_empty()).then_some(found))
    }
}

impl CommitWriter for GitRepository {
    fn is_clean(&self) -> Result<bool, HistoryError> {
        let args = ["diff-index", "--quiet", "HEAD"];
        let output = self.output(&args)?;
        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(self.failure(&args, &output)),
        }
    }

    fn commit(&self, message: &str) -> Result<(), HistoryError> {
        let args = ["commit", "--allow-empty", "-m", message];
        let output = self.output(&args)?;
        if output.status.success() {
            Ok(())
        } else {
            Err(self.failure(&args, &output))
        }
    }

    fn user_name(&self) -> Result<Option<String>, HistoryError> {
        self.config_value("user.name")
    }

    fn user_email(&self) -> Result<Option<String>, HistoryError> {
        self.config_value("user.email")
    }
}
