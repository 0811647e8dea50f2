//! Invocation of the external playlist/download tool.
//!
//! Everything that shells out goes through [`ToolRunner`] so the fetcher and
//! the downloader can be exercised against a fake in tests.

use std::process::Command;

use crate::error::QuizError;

/// Captured result of one tool invocation.
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    /// Exit code, `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Human-readable exit status for error messages.
    pub fn status_text(&self) -> String {
        match self.code {
            Some(c) => format!("exit code {c}"),
            None => "a signal".to_string(),
        }
    }
}

pub trait ToolRunner {
    /// Program name used in logs and error messages.
    fn program(&self) -> &str;

    /// Run the tool to completion with `args`, capturing its output.
    fn run(&self, args: &[String]) -> Result<ToolOutput, QuizError>;

    /// Run and turn a non-zero exit into [`QuizError::ToolFailed`].
    fn run_checked(&self, args: &[String]) -> Result<ToolOutput, QuizError> {
        let out = self.run(args)?;
        if out.success() {
            Ok(out)
        } else {
            Err(QuizError::ToolFailed {
                program: self.program().to_string(),
                status: out.status_text(),
                stderr: out.stderr.trim().to_string(),
            })
        }
    }
}

/// The real `yt-dlp` (or compatible) executable.
pub struct YtDlp {
    program: String,
    extra_args: Vec<String>,
}

impl YtDlp {
    pub fn new(program: impl Into<String>, extra_args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            extra_args,
        }
    }
}

impl ToolRunner for YtDlp {
    fn program(&self) -> &str {
        &self.program
    }

    fn run(&self, args: &[String]) -> Result<ToolOutput, QuizError> {
        log::debug!("running {} {:?}", self.program, args);
        let output = Command::new(&self.program)
            .args(&self.extra_args)
            .args(args)
            .output()
            .map_err(|source| QuizError::ToolSpawn {
                program: self.program.clone(),
                source,
            })?;

        Ok(ToolOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! Scriptable stand-in for `yt-dlp`.

    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::path::PathBuf;

    use super::{ToolOutput, ToolRunner};
    use crate::error::QuizError;

    #[derive(Default)]
    pub struct FakeTool {
        /// Stdout returned for `--flat-playlist` invocations.
        pub listing: String,
        /// Exit code for `--flat-playlist` invocations.
        pub listing_code: i32,
        /// Track URLs whose download exits non-zero.
        pub failing_urls: HashSet<String>,
        pub calls: RefCell<Vec<Vec<String>>>,
    }

    impl FakeTool {
        pub fn with_listing(listing: impl Into<String>) -> Self {
            Self {
                listing: listing.into(),
                ..Self::default()
            }
        }

        pub fn download_calls(&self) -> usize {
            self.calls
                .borrow()
                .iter()
                .filter(|args| args.iter().any(|a| a == "-x"))
                .count()
        }
    }

    impl ToolRunner for FakeTool {
        fn program(&self) -> &str {
            "fake-yt-dlp"
        }

        fn run(&self, args: &[String]) -> Result<ToolOutput, QuizError> {
            self.calls.borrow_mut().push(args.to_vec());

            if args.iter().any(|a| a == "--flat-playlist") {
                return Ok(ToolOutput {
                    code: Some(self.listing_code),
                    stdout: self.listing.clone(),
                    stderr: if self.listing_code == 0 {
                        String::new()
                    } else {
                        "ERROR: playlist does not exist".to_string()
                    },
                });
            }

            let url = args.last().cloned().unwrap_or_default();
            if self.failing_urls.contains(&url) {
                return Ok(ToolOutput {
                    code: Some(1),
                    stdout: String::new(),
                    stderr: "ERROR: video unavailable".to_string(),
                });
            }

            if let Some(pos) = args.iter().position(|a| a == "-o") {
                let out = PathBuf::from(&args[pos + 1]);
                std::fs::write(&out, b"fake audio").map_err(QuizError::Cache)?;
            }
            Ok(ToolOutput {
                code: Some(0),
                ..ToolOutput::default()
            })
        }
    }
}
