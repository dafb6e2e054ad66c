//! Reactive state: shared values, derived values, reactions, marshaling.
//!
//! - [`create_shared`]: a mutable value observed by effects.
//! - [`create_derived`]: cached computation that only notifies on change.
//! - [`create_reaction`]: run a side effect with current and previous values.
//! - [`Scope`]: owns values and effects, freeing them on drop.
//! - [`batch`]: coalesce multiple writes into one notification pass.
//! - [`UiQueue`] / [`UiSender`]: the boundary to the interactive context.

pub mod marshal;
pub mod signal;

pub use marshal::{UiQueue, UiSender};
pub use signal::{
    batch, create_derived, create_effect, create_effect_with_id, create_reaction, create_shared,
    dispose_effect, untrack, Derived, EffectId, Scope, SharedValue,
};
