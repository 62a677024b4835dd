//! Image builder: build and tag an image from the project context.
//!
//! The Dockerfile's presence is verified by the caller before this runs; a
//! missing file is a configuration error, not a build failure.

use crate::application::ports::{ImageOps, ProgressReporter};
use crate::domain::RuntimeError;
use crate::domain::container::BuildSpec;

/// Build `build.tag`, streaming the runtime's output to `reporter.detail`.
///
/// # Errors
///
/// Returns an error if the runtime reports a failed build (non-zero exit,
/// Dockerfile syntax error, timeout).
pub async fn build(
    runtime: &impl ImageOps,
    reporter: &impl ProgressReporter,
    build: &BuildSpec,
) -> Result<(), RuntimeError> {
    reporter.step(&format!(
        "building image {} from {}...",
        build.tag, build.dockerfile
    ));
    tracing::info!(
        tag = %build.tag,
        dockerfile = %build.dockerfile,
        build_args = build.args.len(),
        "building image"
    );
    runtime
        .build_image(build, &|line| reporter.detail(line))
        .await?;
    reporter.success(&format!("image {} built", build.tag));
    Ok(())
}
