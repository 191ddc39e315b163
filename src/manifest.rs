use anyhow::Result;
use serde::Deserialize;
use std::io::Read;
use std::path::PathBuf;

use crate::runner::DEFAULT_EXECUTABLE_DIR;
use crate::step::MagickStep;

/// Declarative list of magick steps, usually kept next to the site sources
/// as `magick-steps.json`:
///
/// ```json
/// {
///   "steps": [
///     { "kind": "file", "path": "photo.jpg", "arguments": ["-resize", "50%"] },
///     { "kind": "optimize-for-web", "path": "images" }
///   ]
/// }
/// ```
#[derive(Deserialize, Debug)]
pub struct Manifest {
    steps: Vec<StepSpec>,
}

#[derive(Deserialize, Debug)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum StepSpec {
    File {
        path: String,
        #[serde(default)]
        arguments: Vec<String>,
        #[serde(default = "default_executable_dir", rename = "executable-dir")]
        executable_dir: PathBuf,
    },
    Folder {
        path: String,
        #[serde(default)]
        arguments: Vec<String>,
        #[serde(default = "default_executable_dir", rename = "executable-dir")]
        executable_dir: PathBuf,
    },
    OptimizeForWeb {
        path: String,
    },
}

fn default_executable_dir() -> PathBuf {
    PathBuf::from(DEFAULT_EXECUTABLE_DIR)
}

impl Manifest {
    pub fn from_reader<R: Read>(input: R) -> Result<Manifest> {
        Ok(serde_json::from_reader(input)?)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn into_steps(self) -> Vec<MagickStep> {
        self.steps
            .into_iter()
            .map(|spec| match spec {
                StepSpec::File {
                    path,
                    arguments,
                    executable_dir,
                } => MagickStep::file(executable_dir, arguments, path),
                StepSpec::Folder {
                    path,
                    arguments,
                    executable_dir,
                } => MagickStep::folder(executable_dir, arguments, path),
                StepSpec::OptimizeForWeb { path } => MagickStep::optimize_for_web(path),
            })
            .collect()
    }
}
