use crate::common::*;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// One `bosh interpolate` call: base manifest, overlays, variables and an
/// optional subtree selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpolateRequest {
    pub manifest_path: PathBuf,
    pub operations_dir: PathBuf,
    pub ops_files: Vec<String>,
    pub vars: Vec<(String, String)>,
    pub vars_file: Option<PathBuf>,
    pub path: Option<String>,
}

impl InterpolateRequest {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(manifest_path: P, operations_dir: Q) -> Self {
        Self {
            manifest_path: manifest_path.as_ref().to_path_buf(),
            operations_dir: operations_dir.as_ref().to_path_buf(),
            ops_files: Vec::new(),
            vars: Vec::new(),
            vars_file: None,
            path: None,
        }
    }

    pub fn ops_file(mut self, overlay: &str) -> Self {
        self.ops_files.push(overlay.to_string());
        self
    }

    pub fn var(mut self, name: &str, value: &str) -> Self {
        self.vars.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_vars_file(mut self, vars_file: Option<PathBuf>) -> Self {
        self.vars_file = vars_file;
        self
    }

    pub fn path(mut self, path: &str) -> Self {
        self.path = Some(path.to_string());
        self
    }

    /// Arguments following the binary name.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "interpolate".to_string(),
            self.manifest_path.to_string_lossy().to_string(),
        ];

        for overlay in &self.ops_files {
            args.extend(["-o".to_string(), overlay.clone()]);
        }
        for (name, value) in &self.vars {
            args.extend(["-v".to_string(), format!("{}={}", name, value)]);
        }
        if let Some(vars_file) = &self.vars_file {
            args.extend(["-l".to_string(), vars_file.to_string_lossy().to_string()]);
        }
        if let Some(path) = &self.path {
            args.extend(["--path".to_string(), path.clone()]);
        }
        args
    }
}

/// Runs an interpolation and hands back the emitted document bytes.
#[allow(async_fn_in_trait)]
pub trait Interpolator {
    async fn interpolate(&self, request: &InterpolateRequest) -> Result<Vec<u8>>;
}

pub struct BoshInterpolator {
    binary: String,
    timeout: Option<Duration>,
}

impl BoshInterpolator {
    pub fn new(binary: &str) -> Self {
        Self {
            binary: binary.to_string(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Looks the binary up on `PATH` (or takes it as given if it is a path).
    fn locate(&self) -> Result<PathBuf> {
        which::which(&self.binary).map_err(|e| {
            HarnessError::Invocation(format!(
                "could not locate interpolation tool '{}': {}",
                self.binary, e
            ))
        })
    }
}

impl Interpolator for BoshInterpolator {
    async fn interpolate(&self, request: &InterpolateRequest) -> Result<Vec<u8>> {
        let binary = self.locate()?;
        let args = request.to_args();
        log::debug!(">> Running: {} {}", binary.display(), args.join(" "));

        let child = Command::new(&binary)
            .args(&args)
            .current_dir(&request.operations_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                HarnessError::Invocation(format!("Failed to execute {}: {}", binary.display(), e))
            })?;

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| {
                    HarnessError::Invocation(format!(
                        "interpolate timed out after {:?} ({})",
                        limit,
                        args.join(" ")
                    ))
                })??,
            None => child.wait_with_output().await?,
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            return Err(HarnessError::Invocation(format!(
                "interpolate exited with {}: {}",
                output.status,
                if stderr.trim().is_empty() { stdout.trim() } else { stderr.trim() }
            )));
        }

        if output.stdout.is_empty() {
            return Err(HarnessError::Invocation(format!(
                "interpolate produced no output ({})",
                args.join(" ")
            )));
        }

        Ok(output.stdout)
    }
}
