//! Call interception for the targeted architecture family.
//!
//! [`ConditioningRepair`] wraps a model invocation path ([`ModelFn`]) and,
//! when the structural signature fires, rewrites a mismatched conditioning
//! tensor to the model's declared width before delegating. For every other
//! model it is a pure pass-through: the only added cost is the detector
//! predicate.

use std::sync::atomic::{AtomicBool, Ordering};

use seam_core::{Result, Tensor};
use seam_nn::Module;

use crate::cache::{self, ProjectionKey};
use crate::signature;

/// Keyword slots checked for the conditioning tensor, in priority order.
pub const CONDITIONING_NAMES: [&str; 3] = ["context", "encoder_hidden_states", "text_embeds"];

/// Index of the positional argument used as a fallback conditioning slot
/// (the argument after the hidden states).
const CONDITIONING_POSITION: usize = 1;

/// Arguments of a model invocation: positional tensors plus named slots.
///
/// This is the explicit calling convention at the interception boundary.
/// An outer caller that only ever sets `context` and an inner caller that
/// passes conditioning positionally both go through the same lookup.
#[derive(Default)]
pub struct CallArgs {
    positional: Vec<Tensor>,
    named: Vec<(String, Tensor)>,
}

/// Where a conditioning tensor was found inside [`CallArgs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Named(usize),
    Positional(usize),
}

impl CallArgs {
    /// Empty argument list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional tensor argument.
    pub fn push(&mut self, tensor: Tensor) {
        self.positional.push(tensor);
    }

    /// Builder-style [`push`](Self::push).
    pub fn with_positional(mut self, tensor: Tensor) -> Self {
        self.push(tensor);
        self
    }

    /// Set a named slot, replacing any previous tensor under that name.
    pub fn insert(&mut self, name: impl Into<String>, tensor: Tensor) {
        let name = name.into();
        if let Some(entry) = self.named.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = tensor;
        } else {
            self.named.push((name, tensor));
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_named(mut self, name: impl Into<String>, tensor: Tensor) -> Self {
        self.insert(name, tensor);
        self
    }

    /// Tensor under a named slot.
    pub fn get(&self, name: &str) -> Option<&Tensor> {
        self.named
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, t)| t)
    }

    /// Positional tensor by index.
    pub fn positional(&self, index: usize) -> Option<&Tensor> {
        self.positional.get(index)
    }

    /// Number of positional arguments.
    pub fn positional_len(&self) -> usize {
        self.positional.len()
    }

    /// Locate the conditioning tensor: named candidates in priority order,
    /// else the second positional argument when it has rank ≥ 2.
    fn conditioning_slot(&self) -> Option<Slot> {
        for name in CONDITIONING_NAMES {
            if let Some(i) = self.named.iter().position(|(n, _)| n == name) {
                return Some(Slot::Named(i));
            }
        }
        match self.positional.get(CONDITIONING_POSITION) {
            Some(t) if t.rank() >= 2 => Some(Slot::Positional(CONDITIONING_POSITION)),
            _ => None,
        }
    }

    fn slot(&self, slot: Slot) -> &Tensor {
        match slot {
            Slot::Named(i) => &self.named[i].1,
            Slot::Positional(i) => &self.positional[i],
        }
    }

    fn replace(&mut self, slot: Slot, tensor: Tensor) {
        match slot {
            Slot::Named(i) => self.named[i].1 = tensor,
            Slot::Positional(i) => self.positional[i] = tensor,
        }
    }
}

/// A model invocation path: the mechanism that runs a model on arguments.
///
/// Implemented for closures, so tests and hosts can pass plain functions.
pub trait ModelFn: Send + Sync {
    fn invoke(&self, model: &dyn Module, args: CallArgs) -> Result<Tensor>;
}

impl<F> ModelFn for F
where
    F: Fn(&dyn Module, CallArgs) -> Result<Tensor> + Send + Sync,
{
    fn invoke(&self, model: &dyn Module, args: CallArgs) -> Result<Tensor> {
        self(model, args)
    }
}

/// Wrapper that repairs conditioning-width mismatches before delegating.
///
/// Detection failures never raise — anything short of a confirmed mismatch
/// on a confirmed target model delegates unchanged. Errors from the
/// delegate itself propagate unmodified.
pub struct ConditioningRepair<F> {
    inner: F,
    announced: AtomicBool,
}

impl<F: ModelFn> ConditioningRepair<F> {
    /// Wrap a model invocation path.
    pub fn wrap(inner: F) -> Self {
        Self {
            inner,
            announced: AtomicBool::new(false),
        }
    }
}

impl<F: ModelFn> ModelFn for ConditioningRepair<F> {
    fn invoke(&self, model: &dyn Module, mut args: CallArgs) -> Result<Tensor> {
        if !signature::is_dual_stream_transformer(model) {
            return self.inner.invoke(model, args);
        }
        let Some(expected) = signature::expected_text_width(model) else {
            return self.inner.invoke(model, args);
        };
        let Some(slot) = args.conditioning_slot() else {
            return self.inner.invoke(model, args);
        };

        // Cheap Arc clone; ends the borrow so the slot can be rewritten.
        let cond = args.slot(slot).clone();
        if cond.rank() < 2 {
            return self.inner.invoke(model, args);
        }
        let actual = cond.width().expect("rank >= 2 has a last dimension");
        // Width 0 has nothing to project and never gets a cache key.
        if actual == 0 || actual == expected {
            return self.inner.invoke(model, args);
        }

        let key = ProjectionKey {
            source: actual,
            target: expected,
            device: cond.device(),
            dtype: cond.dtype(),
        };
        let projection = cache::global().get_or_build(key);
        let repaired = match projection.apply(&cond) {
            Ok(t) => t,
            Err(e) => {
                // Repair failures stay silent; the delegate sees the
                // original arguments.
                tracing::debug!("conditioning repair skipped: {e}");
                return self.inner.invoke(model, args);
            }
        };

        if !self.announced.swap(true, Ordering::Relaxed) {
            tracing::info!(
                "repaired conditioning width {} -> {} (shape {})",
                actual,
                expected,
                cond.shape(),
            );
        } else {
            tracing::debug!("repaired conditioning width {} -> {}", actual, expected);
        }

        args.replace(slot, repaired);
        self.inner.invoke(model, args)
    }
}
