//! Shared values, effects, derived values and reactions.
//!
//! A single-threaded, synchronous runtime kept in a thread-local. Scroll
//! handlers write [`SharedValue`]s every frame; effects that read them are
//! re-run immediately. Handles are `Copy` because they only carry a key.
//!
//! Values and effects live in generational arenas. A [`Scope`] owns the
//! slots a component creates and frees them when dropped; a stale handle
//! never aliases a reused slot.
//!
//! Effects must not touch rendered state directly. Anything that belongs to
//! the interactive context goes through [`super::marshal::UiSender`].

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;

use slotmap::{new_key_type, SlotMap};

// ---------------------------------------------------------------------------
// IDs
// ---------------------------------------------------------------------------

new_key_type! {
    /// Identifies a value slot inside the runtime.
    pub struct ValueId;

    /// Identifies an effect slot inside the runtime.
    pub struct EffectId;
}

// ---------------------------------------------------------------------------
// Runtime internals
// ---------------------------------------------------------------------------

struct ValueSlot {
    value: Box<dyn Any>,
    subscribers: HashSet<EffectId>,
}

struct EffectSlot {
    /// Taken out while the effect runs so no runtime borrow is held across
    /// user code.
    callback: Option<Box<dyn FnMut()>>,
    dependencies: HashSet<ValueId>,
}

struct Runtime {
    values: SlotMap<ValueId, ValueSlot>,
    effects: SlotMap<EffectId, EffectSlot>,
    /// Effect currently executing, for dependency tracking.
    tracking: Option<EffectId>,
    batch_depth: usize,
    /// Effects to run once the current batch or flush completes.
    pending: Vec<EffectId>,
    /// Set while the notification loop is draining.
    flushing: bool,
}

impl Runtime {
    fn new() -> Self {
        Self {
            values: SlotMap::with_key(),
            effects: SlotMap::with_key(),
            tracking: None,
            batch_depth: 0,
            pending: Vec::new(),
            flushing: false,
        }
    }
}

thread_local! {
    static RUNTIME: RefCell<Runtime> = RefCell::new(Runtime::new());
}

fn track(id: ValueId) {
    RUNTIME.with(|rt| {
        let mut rt = rt.borrow_mut();
        let rt = &mut *rt;
        let Some(eid) = rt.tracking else {
            return;
        };
        if let (Some(value), Some(effect)) = (rt.values.get_mut(id), rt.effects.get_mut(eid)) {
            value.subscribers.insert(eid);
            effect.dependencies.insert(id);
        }
    });
}

fn read<T: 'static, R>(id: ValueId, f: impl FnOnce(&T) -> R) -> R {
    RUNTIME.with(|rt| {
        let rt = rt.borrow();
        let value = rt
            .values
            .get(id)
            .and_then(|slot| slot.value.downcast_ref::<T>())
            .expect("shared value disposed or of another type");
        f(value)
    })
}

/// Free a value slot and unlink it from its subscribers.
fn dispose_value(id: ValueId) {
    let removed = RUNTIME.try_with(|rt| {
        let Ok(mut rt) = rt.try_borrow_mut() else {
            return None;
        };
        let slot = rt.values.remove(id)?;
        for eid in &slot.subscribers {
            if let Some(effect) = rt.effects.get_mut(*eid) {
                effect.dependencies.remove(&id);
            }
        }
        Some(slot)
    });
    // Dropped outside the runtime borrow.
    drop(removed);
}

// ---------------------------------------------------------------------------
// SharedValue
// ---------------------------------------------------------------------------

/// Create a shared value with the given initial value.
///
/// The slot lives until the thread ends; use [`Scope::shared`] to tie it to
/// an owner instead.
pub fn create_shared<T: 'static>(initial: T) -> SharedValue<T> {
    let id = RUNTIME.with(|rt| {
        rt.borrow_mut().values.insert(ValueSlot {
            value: Box::new(initial),
            subscribers: HashSet::new(),
        })
    });
    SharedValue {
        id,
        _marker: PhantomData,
    }
}

/// A mutable value observed by effects.
///
/// Reading inside an effect subscribes that effect; writing re-runs every
/// subscriber. Writes never compare against the old value. Reading a
/// disposed value panics; writing one does nothing.
pub struct SharedValue<T: 'static> {
    id: ValueId,
    _marker: PhantomData<T>,
}

impl<T: 'static> Copy for SharedValue<T> {}
impl<T: 'static> Clone for SharedValue<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> fmt::Debug for SharedValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedValue").field("id", &self.id).finish()
    }
}

impl<T: 'static> SharedValue<T> {
    /// Read the current value, subscribing the running effect (if any).
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.with(T::clone)
    }

    /// Read by reference. Still subscribes the running effect.
    ///
    /// `f` must not read or write other shared values.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        track(self.id);
        read(self.id, f)
    }

    /// Read without subscribing any running effect.
    pub fn get_untracked(&self) -> T
    where
        T: Clone,
    {
        read(self.id, T::clone)
    }

    /// Overwrite the value and notify subscribers.
    pub fn set(&self, value: T) {
        let subs = RUNTIME.with(|rt| {
            let mut rt = rt.borrow_mut();
            match rt.values.get_mut(self.id) {
                Some(slot) => {
                    slot.value = Box::new(value);
                    slot.subscribers.iter().copied().collect::<Vec<_>>()
                }
                None => Vec::new(),
            }
        });
        notify(subs);
    }

    /// Mutate the value in place and notify subscribers.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let subs = RUNTIME.with(|rt| {
            let mut rt = rt.borrow_mut();
            let Some(slot) = rt.values.get_mut(self.id) else {
                return Vec::new();
            };
            let value = slot
                .value
                .downcast_mut::<T>()
                .expect("shared value type mismatch");
            f(value);
            slot.subscribers.iter().copied().collect::<Vec<_>>()
        });
        notify(subs);
    }

    /// A read-only view of this value.
    pub fn read_only(&self) -> Derived<T> {
        Derived {
            id: self.id,
            _marker: PhantomData,
        }
    }
}

// ---------------------------------------------------------------------------
// Derived
// ---------------------------------------------------------------------------

/// Read-only half of a value, returned by [`create_derived`].
pub struct Derived<T: 'static> {
    id: ValueId,
    _marker: PhantomData<T>,
}

impl<T: 'static> Copy for Derived<T> {}
impl<T: 'static> Clone for Derived<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> fmt::Debug for Derived<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Derived").field("id", &self.id).finish()
    }
}

impl<T: 'static> Derived<T> {
    /// Read the current value, subscribing the running effect (if any).
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.with(T::clone)
    }

    /// Read by reference. `f` must not touch other shared values.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        track(self.id);
        read(self.id, f)
    }

    /// Read without subscribing any running effect.
    pub fn get_untracked(&self) -> T
    where
        T: Clone,
    {
        read(self.id, T::clone)
    }
}

// ---------------------------------------------------------------------------
// Effects
// ---------------------------------------------------------------------------

/// Create a side effect that re-runs whenever a value it read changes.
///
/// The closure runs once immediately to establish its dependencies.
pub fn create_effect(f: impl FnMut() + 'static) {
    create_effect_with_id(f);
}

/// Create an effect and return its [`EffectId`] so it can be disposed.
pub fn create_effect_with_id(f: impl FnMut() + 'static) -> EffectId {
    let eid = RUNTIME.with(|rt| {
        rt.borrow_mut().effects.insert(EffectSlot {
            callback: Some(Box::new(f)),
            dependencies: HashSet::new(),
        })
    });
    run_effect(eid);
    eid
}

/// Stop an effect and free its slot. Idempotent.
///
/// Safe to call from `Drop` during thread teardown.
pub fn dispose_effect(eid: EffectId) {
    let removed = RUNTIME.try_with(|rt| {
        let Ok(mut rt) = rt.try_borrow_mut() else {
            return None;
        };
        let slot = rt.effects.remove(eid)?;
        for id in &slot.dependencies {
            if let Some(value) = rt.values.get_mut(*id) {
                value.subscribers.remove(&eid);
            }
        }
        Some(slot)
    });
    drop(removed);
}

/// Create a memoised derived value.
///
/// `f` re-runs when its dependencies change; downstream subscribers are only
/// notified when the result differs by `PartialEq`.
pub fn create_derived<T: Clone + PartialEq + 'static>(
    f: impl FnMut() -> T + 'static,
) -> Derived<T> {
    derived_with_effect(f).0
}

fn derived_with_effect<T: Clone + PartialEq + 'static>(
    mut f: impl FnMut() -> T + 'static,
) -> (Derived<T>, EffectId) {
    let first = untrack(&mut f);
    let value = create_shared(first);
    let eid = create_effect_with_id(move || {
        let next = f();
        let changed = read(value.id, |current: &T| current != &next);
        if changed {
            value.set(next);
        }
    });
    (value.read_only(), eid)
}

/// React to changes of a prepared value.
///
/// `prepare` is tracked; `react(current, previous)` runs untracked, only when
/// the prepared value changed. `previous` is `None` on the first run.
pub fn create_reaction<T, P, R>(mut prepare: P, mut react: R) -> EffectId
where
    T: PartialEq + 'static,
    P: FnMut() -> T + 'static,
    R: FnMut(&T, Option<&T>) + 'static,
{
    let mut previous: Option<T> = None;
    create_effect_with_id(move || {
        let current = prepare();
        if previous.as_ref() == Some(&current) {
            return;
        }
        untrack(|| react(&current, previous.as_ref()));
        previous = Some(current);
    })
}

/// Run `f` without subscribing the currently running effect.
pub fn untrack<R>(f: impl FnOnce() -> R) -> R {
    let prev = RUNTIME.with(|rt| rt.borrow_mut().tracking.take());
    let out = f();
    RUNTIME.with(|rt| rt.borrow_mut().tracking = prev);
    out
}

// ---------------------------------------------------------------------------
// Scope
// ---------------------------------------------------------------------------

/// Owns the values and effects created through it and frees them on drop.
///
/// Effects are disposed before values. Handles that outlive their scope
/// must not be read.
#[derive(Default)]
pub struct Scope {
    values: Vec<ValueId>,
    effects: Vec<EffectId>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// [`create_shared`], owned by this scope.
    pub fn shared<T: 'static>(&mut self, initial: T) -> SharedValue<T> {
        let value = create_shared(initial);
        self.values.push(value.id);
        value
    }

    /// [`create_derived`], owned by this scope.
    pub fn derived<T: Clone + PartialEq + 'static>(
        &mut self,
        f: impl FnMut() -> T + 'static,
    ) -> Derived<T> {
        let (derived, eid) = derived_with_effect(f);
        self.effects.push(eid);
        self.values.push(derived.id);
        derived
    }

    /// [`create_reaction`], owned by this scope.
    pub fn reaction<T, P, R>(&mut self, prepare: P, react: R) -> EffectId
    where
        T: PartialEq + 'static,
        P: FnMut() -> T + 'static,
        R: FnMut(&T, Option<&T>) + 'static,
    {
        let eid = create_reaction(prepare, react);
        self.effects.push(eid);
        eid
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        for eid in self.effects.drain(..) {
            dispose_effect(eid);
        }
        for id in self.values.drain(..) {
            dispose_value(id);
        }
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("values", &self.values.len())
            .field("effects", &self.effects.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Batch
// ---------------------------------------------------------------------------

/// Group several writes so each affected effect runs once.
pub fn batch(f: impl FnOnce()) {
    RUNTIME.with(|rt| rt.borrow_mut().batch_depth += 1);

    f();

    let pending = RUNTIME.with(|rt| {
        let mut rt = rt.borrow_mut();
        rt.batch_depth -= 1;
        if rt.batch_depth > 0 {
            return Vec::new();
        }
        let mut seen = HashSet::new();
        rt.pending
            .drain(..)
            .filter(|id| seen.insert(*id))
            .collect::<Vec<_>>()
    });

    notify(pending);
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn run_effect(eid: EffectId) {
    let callback = RUNTIME.with(|rt| {
        let mut rt = rt.borrow_mut();
        let rt = &mut *rt;
        let slot = rt.effects.get_mut(eid)?;
        for id in slot.dependencies.drain() {
            if let Some(value) = rt.values.get_mut(id) {
                value.subscribers.remove(&eid);
            }
        }
        slot.callback.take()
    });

    let Some(mut callback) = callback else {
        return;
    };

    let prev = RUNTIME.with(|rt| rt.borrow_mut().tracking.replace(eid));

    callback();

    // An effect disposed while running loses its callback here.
    let orphaned = RUNTIME.with(|rt| {
        let mut rt = rt.borrow_mut();
        rt.tracking = prev;
        match rt.effects.get_mut(eid) {
            Some(slot) => {
                slot.callback = Some(callback);
                None
            }
            None => Some(callback),
        }
    });
    drop(orphaned);
}

fn notify(subs: Vec<EffectId>) {
    if subs.is_empty() {
        return;
    }

    // Inside a batch or an ongoing flush: queue and let the outer loop run them.
    let deferred = RUNTIME.with(|rt| {
        let mut rt = rt.borrow_mut();
        if rt.batch_depth > 0 || rt.flushing {
            rt.pending.extend(subs.iter().copied());
            true
        } else {
            rt.flushing = true;
            false
        }
    });
    if deferred {
        return;
    }

    let mut queue = subs;
    while !queue.is_empty() {
        for eid in std::mem::take(&mut queue) {
            run_effect(eid);
        }
        RUNTIME.with(|rt| queue.append(&mut rt.borrow_mut().pending));
    }

    RUNTIME.with(|rt| rt.borrow_mut().flushing = false);
}

/// Live `(values, effects)` slots on this thread.
#[cfg(test)]
pub(crate) fn live_slots() -> (usize, usize) {
    RUNTIME.with(|rt| {
        let rt = rt.borrow();
        (rt.values.len(), rt.effects.len())
    })
}

#[cfg(test)]
pub(crate) fn reset_runtime() {
    RUNTIME.with(|rt| *rt.borrow_mut() = Runtime::new());
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
