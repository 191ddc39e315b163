use log::{debug, error};
use std::path::PathBuf;

use crate::context::BuildContext;
use crate::runner::{
    folder_glob, run_to_completion, Invocation, RunError, Spawner, SystemSpawner,
    DEFAULT_EXECUTABLE_DIR, MOGRIFY_MODE, WEB_PRESET_ARGS,
};

/// The three shapes of magick work a site build can ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Run `magick` with caller-supplied arguments on a single file.
    File {
        executable_dir: PathBuf,
        arguments: Vec<String>,
        file: String,
    },
    /// Run `magick` with caller-supplied arguments on every entry of a folder.
    Folder {
        executable_dir: PathBuf,
        arguments: Vec<String>,
        folder: String,
    },
    /// Run `magick mogrify` with the fixed web preset on every entry of a folder.
    OptimizeForWeb { folder: String },
}

/// One image-processing step of a site build.
///
/// A step is constructed up front and executed later with access to the
/// build context. Execution is best-effort: a failed step logs a diagnostic
/// and lets the rest of the build carry on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagickStep {
    name: String,
    op: Operation,
}

impl MagickStep {
    /// Custom `magick` command on a single file. The resolved path is
    /// appended after `arguments`.
    pub fn file<P, S>(executable_dir: P, arguments: Vec<String>, file: S) -> Self
    where
        P: Into<PathBuf>,
        S: Into<String>,
    {
        let file = file.into();
        MagickStep {
            name: format!("Magick custom command for {}", file),
            op: Operation::File {
                executable_dir: executable_dir.into(),
                arguments,
                file,
            },
        }
    }

    /// Custom `magick` command on all files in a folder. The resolved folder
    /// is appended after `arguments` as a non-recursive `*.*` pattern.
    pub fn folder<P, S>(executable_dir: P, arguments: Vec<String>, folder: S) -> Self
    where
        P: Into<PathBuf>,
        S: Into<String>,
    {
        let folder = folder.into();
        MagickStep {
            name: format!("Magick custom command at {}", folder),
            op: Operation::Folder {
                executable_dir: executable_dir.into(),
                arguments,
                folder,
            },
        }
    }

    /// Predefined `magick mogrify` pass tuned for web image delivery.
    /// Takes no arguments: the flag list is a design constant.
    pub fn optimize_for_web<S: Into<String>>(folder: S) -> Self {
        let folder = folder.into();
        MagickStep {
            name: format!("Magick optimize for web at {}", folder),
            op: Operation::OptimizeForWeb { folder },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn operation(&self) -> &Operation {
        &self.op
    }

    /// Resolve the step's target and assemble the final argument vector.
    /// The target is always the last element, after all other arguments.
    pub fn invocation<C: BuildContext>(&self, context: &C) -> Result<Invocation, RunError> {
        match &self.op {
            Operation::File {
                executable_dir,
                arguments,
                file,
            } => {
                let resolved = context
                    .resolve_file(file)
                    .ok_or_else(|| RunError::FileNotFound(file.clone()))?;
                let mut args = arguments.clone();
                args.push(resolved.to_string_lossy().into_owned());
                Ok(Invocation::magick(executable_dir, args))
            }
            Operation::Folder {
                executable_dir,
                arguments,
                folder,
            } => {
                let resolved = context
                    .resolve_folder(folder)
                    .ok_or_else(|| RunError::FolderNotFound(folder.clone()))?;
                let mut args = arguments.clone();
                args.push(folder_glob(&resolved));
                Ok(Invocation::magick(executable_dir, args))
            }
            Operation::OptimizeForWeb { folder } => {
                let resolved = context
                    .resolve_folder(folder)
                    .ok_or_else(|| RunError::FolderNotFound(folder.clone()))?;
                let mut args = Vec::with_capacity(WEB_PRESET_ARGS.len() + 2);
                args.push(MOGRIFY_MODE.to_string());
                args.extend(WEB_PRESET_ARGS.iter().map(|s| s.to_string()));
                args.push(folder_glob(&resolved));
                Ok(Invocation::magick(DEFAULT_EXECUTABLE_DIR, args))
            }
        }
    }

    /// Run the step to completion. Nothing is spawned when resolution fails.
    pub fn run<C, S>(&self, context: &C, spawner: &S) -> Result<(), RunError>
    where
        C: BuildContext,
        S: Spawner,
    {
        let invocation = self.invocation(context)?;
        debug!(
            "{}: {} {}",
            self.name,
            invocation.program.display(),
            invocation.args.join(" ")
        );
        run_to_completion(spawner, &invocation)
    }

    /// Fire-and-forget entry point for the build pipeline: any failure is
    /// logged and swallowed so one bad image cannot abort a whole site build.
    pub fn execute<C: BuildContext>(&self, context: &C) {
        self.execute_with(context, &SystemSpawner)
    }

    pub fn execute_with<C, S>(&self, context: &C, spawner: &S)
    where
        C: BuildContext,
        S: Spawner,
    {
        if let Err(err) = self.run(context, spawner) {
            error!("{}: {}", self.name, err);
        }
    }
}
