use std::path::Path;

use anyhow::Context as _;

use crate::core::{FrameIndex, FrameWindow};
use crate::error::StereorigResult;
use crate::invoke::{Invocation, ProcessRunner};
use crate::raytracer::SnapshotNaming;
use crate::rig::Eye;

/// Options for the side-by-side merge pass.
#[derive(Clone, Copy, Debug)]
pub struct MergeOpts {
    /// Re-run `convert` even when the merged file already exists.
    pub remerge: bool,
    /// Delete the per-eye snapshots after each visited frame.
    pub remove_after: bool,
    /// Snapshots carry the raytracer's `_0.jpg` suffix; `false` after a
    /// skipped render, where plain `.jpg` files are expected.
    pub rendered: bool,
}

/// Merge left/right snapshots into side-by-side frames via ImageMagick
/// `convert`.
///
/// Walks the global frame index from 0, stopping at the window's exclusive
/// end or at the first index where either eye's snapshot is missing on disk.
/// The walk starts at 0 regardless of the window start so a resumed run can
/// still composite frames rendered earlier. Returns the number of `convert`
/// invocations issued.
pub fn merge_frames(
    naming: &SnapshotNaming,
    window: FrameWindow,
    opts: &MergeOpts,
    runner: &mut dyn ProcessRunner,
) -> StereorigResult<u64> {
    let mut merged = 0u64;
    let mut index = FrameIndex(0);
    loop {
        if window.ends_at(index) {
            break;
        }

        let left = naming.snapshot_path(Eye::Left, index, opts.rendered);
        let right = naming.snapshot_path(Eye::Right, index, opts.rendered);
        if !left.is_file() || !right.is_file() {
            tracing::debug!(index = index.0, "merge walk stopping at missing snapshot pair");
            break;
        }

        let out = naming.merged_path(index);
        if opts.remerge || !out.is_file() {
            tracing::info!(index = index.0, "merging stereo frame");
            runner.run(&convert_invocation(&left, &right, &out))?;
            merged += 1;
        }

        if opts.remove_after {
            std::fs::remove_file(&left)
                .with_context(|| format!("remove snapshot '{}'", left.display()))?;
            std::fs::remove_file(&right)
                .with_context(|| format!("remove snapshot '{}'", right.display()))?;
        }

        index = FrameIndex(index.0 + 1);
    }
    Ok(merged)
}

fn convert_invocation(left: &Path, right: &Path, out: &Path) -> Invocation {
    Invocation::new("convert")
        .arg(left.display().to_string())
        .arg(right.display().to_string())
        .args(["+append", "-quality", "100"])
        .arg(out.display().to_string())
}
