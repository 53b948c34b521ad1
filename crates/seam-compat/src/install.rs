//! Process-wide installation of the compatibility patches.
//!
//! [`install`] flips a one-way installed flag and warms the projection
//! cache; the wrapping helpers then arm the interceptors. Until it has
//! run, [`patch_model_fn`] and [`patch_tile_fn`] hand the delegate back
//! unwrapped, so a host that never installs observes original behavior
//! everywhere. Installation failures are caught and logged — the host
//! degrades to "no repair applied", never a crash.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use seam_core::Result;

use crate::cache;
use crate::intercept::{ConditioningRepair, ModelFn};
use crate::tiling::{RankAdapter, TileFn};

/// One-way patch state: set only after setup succeeds, never reversed.
static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Serializes installation so the flag and the setup it reports stay in
/// step under concurrent callers.
static INSTALL_LOCK: Mutex<()> = Mutex::new(());

/// Install the compatibility patches. Idempotent; call once at startup.
pub fn install() {
    let _guard = INSTALL_LOCK.lock();
    if is_installed() {
        tracing::debug!("compatibility patches already installed");
        return;
    }
    arm(&INSTALLED, try_install);
}

/// Flip `flag` only when `setup` succeeds. A failed setup is logged and
/// leaves the patches unarmed, so the wrapping helpers keep handing
/// delegates back unwrapped.
fn arm(flag: &AtomicBool, setup: impl FnOnce() -> Result<()>) {
    match setup() {
        Ok(()) => flag.store(true, Ordering::SeqCst),
        Err(e) => tracing::error!("failed to install compatibility patches: {e}"),
    }
}

fn try_install() -> Result<()> {
    // Warm the shared cache so the first repair pays no init cost.
    let _ = cache::global();
    tracing::info!("conditioning width repair installed");
    Ok(())
}

/// Whether [`install`] has run.
pub fn is_installed() -> bool {
    INSTALLED.load(Ordering::SeqCst)
}

/// Wrap a model invocation path with the conditioning repair interceptor.
///
/// Before [`install`] has run, the delegate is returned unwrapped.
pub fn patch_model_fn<F: ModelFn + 'static>(inner: F) -> Box<dyn ModelFn> {
    if is_installed() {
        Box::new(ConditioningRepair::wrap(inner))
    } else {
        Box::new(inner)
    }
}

/// Wrap a tiling invocation path with the rank adapter.
///
/// Only hosts that have a tiling stage call this; a process without one
/// never constructs an adapter, and that absence is not an error.
pub fn patch_tile_fn<F: TileFn + 'static>(inner: F) -> Box<dyn TileFn> {
    if is_installed() {
        Box::new(RankAdapter::wrap(inner))
    } else {
        Box::new(inner)
    }
}
