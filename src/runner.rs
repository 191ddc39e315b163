use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// Where Homebrew installs ImageMagick.
pub const DEFAULT_EXECUTABLE_DIR: &str = "/usr/local/bin";
/// Name of the ImageMagick entry-point binary.
pub const MAGICK_BINARY: &str = "magick";
/// Sub-mode of `magick` that edits images in place.
pub const MOGRIFY_MODE: &str = "mogrify";

/// Flags for the web-delivery preset, from
/// <https://www.smashingmagazine.com/2015/06/efficient-image-resizing-with-imagemagick/>.
/// The list is fixed; callers cannot extend or override it.
pub const WEB_PRESET_ARGS: [&str; 27] = [
    "-filter",
    "Triangle",
    "-define",
    "filter:support=2",
    "-unsharp",
    "0.25x0.25+8+0.065",
    "-dither",
    "None",
    "-posterize",
    "136",
    "-quality",
    "82",
    "-define",
    "jpeg:fancy-upsampling=off",
    "-define",
    "png:compression-filter=5",
    "-define",
    "png:compression-level=9",
    "-define",
    "png:compression-strategy=1",
    "-define",
    "png:exclude-chunk=all",
    "-interlace",
    "none",
    "-colorspace",
    "sRGB",
    "-strip",
];

/// One fully-assembled external command: the program to start and its
/// argument vector, in final order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl Invocation {
    /// An invocation of `<executable_dir>/magick` with the given arguments.
    pub fn magick<P: AsRef<Path>>(executable_dir: P, args: Vec<String>) -> Self {
        Invocation {
            program: executable_dir.as_ref().join(MAGICK_BINARY),
            args,
        }
    }
}

/// Wildcard pattern selecting every entry directly inside `folder`,
/// non-recursively. ImageMagick expands the pattern itself, so this works
/// without a shell in between.
pub fn folder_glob(folder: &Path) -> String {
    folder.join("*.*").to_string_lossy().into_owned()
}

/// Everything that can go wrong between resolving a target and the external
/// process exiting.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("cannot find file `{0}`")]
    FileNotFound(String),
    #[error("cannot find folder `{0}`")]
    FolderNotFound(String),
    #[error("cannot launch `{}`: {}", .program.display(), .source)]
    Launch {
        program: PathBuf,
        source: io::Error,
    },
    #[error("`{}` failed with exit code {}", .program.display(), .code)]
    Failed { program: PathBuf, code: i32 },
    #[error("`{}` terminated without an exit code", .program.display())]
    Interrupted { program: PathBuf },
}

/// The process-spawning boundary. `run` blocks until the child exits and
/// returns its exit code, or `None` when the child was killed by a signal.
pub trait Spawner {
    fn run(&self, invocation: &Invocation) -> io::Result<Option<i32>>;
}

/// Spawner backed by the operating system. Stdio is inherited from the
/// calling process; nothing is captured.
pub struct SystemSpawner;

impl Spawner for SystemSpawner {
    fn run(&self, invocation: &Invocation) -> io::Result<Option<i32>> {
        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .status()?;
        Ok(status.code())
    }
}

/// Run `invocation` on `spawner` and fold the outcome into a `RunError`
/// taxonomy: launch failure, non-zero exit, or signal termination.
pub fn run_to_completion<S: Spawner>(spawner: &S, invocation: &Invocation) -> Result<(), RunError> {
    match spawner.run(invocation) {
        Ok(Some(0)) => Ok(()),
        Ok(Some(code)) => Err(RunError::Failed {
            program: invocation.program.clone(),
            code,
        }),
        Ok(None) => Err(RunError::Interrupted {
            program: invocation.program.clone(),
        }),
        Err(source) => Err(RunError::Launch {
            program: invocation.program.clone(),
            source,
        }),
    }
}

pub mod mocks {
    //! Spawner doubles for exercising step logic without a real ImageMagick.

    use super::*;
    use std::sync::Mutex;

    /// What the double reports after recording an invocation.
    pub enum MockOutcome {
        Exit(i32),
        Signal,
        LaunchFailure(io::ErrorKind),
    }

    /// Records every invocation it receives and replays a scripted outcome.
    pub struct RecordingSpawner {
        outcome: MockOutcome,
        invocations: Mutex<Vec<Invocation>>,
    }

    impl RecordingSpawner {
        pub fn new(outcome: MockOutcome) -> Self {
            RecordingSpawner {
                outcome,
                invocations: Mutex::new(Vec::new()),
            }
        }

        pub fn succeeding() -> Self {
            Self::new(MockOutcome::Exit(0))
        }

        pub fn failing(code: i32) -> Self {
            Self::new(MockOutcome::Exit(code))
        }

        pub fn invocations(&self) -> Vec<Invocation> {
            self.invocations.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.invocations.lock().unwrap().len()
        }
    }

    impl Spawner for RecordingSpawner {
        fn run(&self, invocation: &Invocation) -> io::Result<Option<i32>> {
            self.invocations.lock().unwrap().push(invocation.clone());
            match self.outcome {
                MockOutcome::Exit(code) => Ok(Some(code)),
                MockOutcome::Signal => Ok(None),
                MockOutcome::LaunchFailure(kind) => Err(io::Error::from(kind)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mocks::{MockOutcome, RecordingSpawner};
    use super::*;

    #[test]
    fn magick_invocation_points_into_executable_dir() {
        let invocation = Invocation::magick("/usr/local/bin", vec!["-strip".to_string()]);
        assert_eq!(invocation.program, PathBuf::from("/usr/local/bin/magick"));
        assert_eq!(invocation.args, vec!["-strip".to_string()]);
    }

    #[test]
    fn folder_glob_selects_direct_entries() {
        let glob = folder_glob(Path::new("/site/assets/images"));
        assert_eq!(glob, "/site/assets/images/*.*");
    }

    #[test]
    fn web_preset_is_the_fixed_flag_list() {
        assert_eq!(WEB_PRESET_ARGS.len(), 27);
        assert_eq!(
            WEB_PRESET_ARGS.join(" "),
            "-filter Triangle -define filter:support=2 -unsharp 0.25x0.25+8+0.065 \
             -dither None -posterize 136 -quality 82 -define jpeg:fancy-upsampling=off \
             -define png:compression-filter=5 -define png:compression-level=9 \
             -define png:compression-strategy=1 -define png:exclude-chunk=all \
             -interlace none -colorspace sRGB -strip"
        );
    }

    #[test]
    fn zero_exit_is_success() {
        let spawner = RecordingSpawner::succeeding();
        let invocation = Invocation::magick("/usr/local/bin", vec![]);
        assert!(run_to_completion(&spawner, &invocation).is_ok());
        assert_eq!(spawner.call_count(), 1);
    }

    #[test]
    fn nonzero_exit_maps_to_failed() {
        let spawner = RecordingSpawner::failing(2);
        let invocation = Invocation::magick("/usr/local/bin", vec![]);
        match run_to_completion(&spawner, &invocation) {
            Err(RunError::Failed { code, .. }) => assert_eq!(code, 2),
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[test]
    fn signal_termination_maps_to_interrupted() {
        let spawner = RecordingSpawner::new(MockOutcome::Signal);
        let invocation = Invocation::magick("/usr/local/bin", vec![]);
        match run_to_completion(&spawner, &invocation) {
            Err(RunError::Interrupted { .. }) => {}
            other => panic!("expected Interrupted, got {:?}", other),
        }
    }

    #[test]
    fn spawn_error_maps_to_launch() {
        let spawner = RecordingSpawner::new(MockOutcome::LaunchFailure(io::ErrorKind::NotFound));
        let invocation = Invocation::magick("/nowhere", vec![]);
        match run_to_completion(&spawner, &invocation) {
            Err(RunError::Launch { program, .. }) => {
                assert_eq!(program, PathBuf::from("/nowhere/magick"))
            }
            other => panic!("expected Launch, got {:?}", other),
        }
    }
}
