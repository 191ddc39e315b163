mod context;
mod manifest;
mod runner;
mod step;

pub use context::{BuildContext, DirectoryContext};
pub use manifest::{Manifest, StepSpec};
pub use runner::{
    folder_glob, mocks, run_to_completion, Invocation, RunError, Spawner, SystemSpawner,
    DEFAULT_EXECUTABLE_DIR, MAGICK_BINARY, MOGRIFY_MODE, WEB_PRESET_ARGS,
};
pub use step::{MagickStep, Operation};
