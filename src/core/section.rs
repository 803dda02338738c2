//! Named sections and their weakly held interning registry
//!
//! A [`Section`] is a cheap, clonable handle. Every handle for the same name
//! obtained from one registry points at the same state, so a level set through
//! one handle is seen through all of them.
//!
//! The registry only keeps weak references. A section disappears once the last
//! handle is dropped. Dead map slots are swept when an intern finds the map
//! has grown to twice its last live size, on [`SectionRegistry::purge`], and
//! during a recompute pass.

use super::severity::Severity;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

#[derive(Debug, Clone, Copy)]
struct SectionState {
    level: Severity,
    overridden: bool,
}

#[derive(Debug)]
struct SectionInner {
    name: String,
    state: Mutex<SectionState>,
}

/// Handle to an interned, mutable severity-filtering unit
#[derive(Clone)]
pub struct Section {
    inner: Arc<SectionInner>,
}

impl Section {
    fn new(name: &str, level: Severity) -> Self {
        Self {
            inner: Arc::new(SectionInner {
                name: name.to_string(),
                state: Mutex::new(SectionState {
                    level,
                    overridden: false,
                }),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Current resolved minimum severity
    pub fn level(&self) -> Severity {
        self.inner.state.lock().level
    }

    /// Whether the level was pinned with [`Section::set_level`]
    pub fn is_overridden(&self) -> bool {
        self.inner.state.lock().overridden
    }

    /// Pin the level; rule reloads leave it alone until it is reset.
    pub fn set_level(&self, level: Severity) {
        let mut state = self.inner.state.lock();
        state.level = level;
        state.overridden = true;
    }

    /// Clear an override and fall back to `resolved`. No-op if not overridden.
    ///
    /// Returns whether the section was overridden.
    pub(crate) fn clear_override(&self, resolved: Severity) -> bool {
        let mut state = self.inner.state.lock();
        if !state.overridden {
            return false;
        }
        state.overridden = false;
        state.level = resolved;
        true
    }

    /// Apply a freshly resolved level unless the section is overridden.
    pub(crate) fn refresh(&self, resolved: Severity) -> bool {
        let mut state = self.inner.state.lock();
        if state.overridden {
            return false;
        }
        state.level = resolved;
        true
    }

    /// Whether two handles refer to the same interned section
    pub fn ptr_eq(&self, other: &Section) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = *self.inner.state.lock();
        f.debug_struct("Section")
            .field("name", &self.inner.name)
            .field("level", &state.level)
            .field("overridden", &state.overridden)
            .finish()
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.name)
    }
}

impl PartialEq for Section {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Section {}

impl Hash for Section {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.inner).hash(state);
    }
}

/// Name-keyed interning set holding sections weakly
#[derive(Debug, Default)]
pub struct SectionRegistry {
    entries: Mutex<Slots>,
}

/// Map of weak slots plus the size at which intern sweeps dead ones
#[derive(Debug)]
struct Slots {
    map: HashMap<String, Weak<SectionInner>>,
    sweep_at: usize,
}

impl Slots {
    const MIN_SWEEP: usize = 64;

    /// Drop dead slots; the next sweep on intern comes once the map holds
    /// twice the survivors.
    fn sweep(&mut self) -> usize {
        let before = self.map.len();
        self.map.retain(|_, weak| weak.strong_count() > 0);
        self.sweep_at = (self.map.len() * 2).max(Self::MIN_SWEEP);
        before - self.map.len()
    }
}

impl Default for Slots {
    fn default() -> Self {
        Self {
            map: HashMap::new(),
            sweep_at: Self::MIN_SWEEP,
        }
    }
}

impl SectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the live section called `name`, creating it with `resolve(name)`
    /// if none exists.
    ///
    /// An existing section is returned untouched, override state included.
    pub fn intern(&self, name: &str, resolve: impl FnOnce(&str) -> Severity) -> Section {
        let mut slots = self.entries.lock();

        if let Some(inner) = slots.map.get(name).and_then(Weak::upgrade) {
            return Section { inner };
        }

        if slots.map.len() >= slots.sweep_at {
            slots.sweep();
        }

        let section = Section::new(name, resolve(name));
        slots
            .map
            .insert(name.to_string(), Arc::downgrade(&section.inner));
        section
    }

    /// Snapshot of the currently live sections; dead slots are dropped.
    pub fn live(&self) -> Vec<Section> {
        let mut slots = self.entries.lock();
        let live: Vec<Section> = slots
            .map
            .values()
            .filter_map(Weak::upgrade)
            .map(|inner| Section { inner })
            .collect();

        slots.sweep();
        live
    }

    /// Re-resolve every live, non-overridden section.
    ///
    /// Iterates over a snapshot, so sections interned meanwhile are not
    /// visited; they were created against the current rules already.
    /// Returns the number of sections updated.
    pub fn recompute_all(&self, resolve: impl Fn(&str) -> Severity) -> usize {
        self.live()
            .iter()
            .filter(|section| section.refresh(resolve(section.name())))
            .count()
    }

    /// Drop map slots whose section is gone; returns how many were removed.
    pub fn purge(&self) -> usize {
        self.entries.lock().sweep()
    }

    /// Number of live sections
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .map
            .values()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slots currently held, dead ones included
    #[cfg(test)]
    fn slot_count(&self) -> usize {
        self.entries.lock().map.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(level: Severity) -> impl Fn(&str) -> Severity {
        move |_| level
    }

    #[test]
    fn test_intern_shares_state() {
        let registry = SectionRegistry::new();
        let a = registry.intern("x", fixed(Severity::Info));
        let b = registry.intern("x", fixed(Severity::Fatal));

        assert!(a.ptr_eq(&b));
        assert_eq!(b.level(), Severity::Info);

        a.set_level(Severity::Error);
        assert_eq!(b.level(), Severity::Error);
        assert!(b.is_overridden());
    }

    #[test]
    fn test_intern_preserves_override() {
        let registry = SectionRegistry::new();
        let a = registry.intern("x", fixed(Severity::Info));
        a.set_level(Severity::Fatal);

        let b = registry.intern("x", fixed(Severity::Debug));
        assert_eq!(b.level(), Severity::Fatal);
        assert!(b.is_overridden());
    }

    #[test]
    fn test_weak_membership() {
        let registry = SectionRegistry::new();
        let a = registry.intern("gone", fixed(Severity::Info));
        a.set_level(Severity::Fatal);
        assert_eq!(registry.len(), 1);

        drop(a);
        assert_eq!(registry.len(), 0);
        assert_eq!(registry.purge(), 1);

        // A new instance starts from the rules again
        let b = registry.intern("gone", fixed(Severity::Info));
        assert_eq!(b.level(), Severity::Info);
        assert!(!b.is_overridden());
    }

    #[test]
    fn test_intern_sweeps_dead_slots() {
        let registry = SectionRegistry::new();
        let kept = registry.intern("kept", fixed(Severity::Info));

        for i in 0..1_000 {
            let _ = registry.intern(&format!("short.{}", i), fixed(Severity::Info));
        }

        assert_eq!(registry.len(), 1);
        assert!(registry.slot_count() <= Slots::MIN_SWEEP);
        assert!(registry.intern("kept", fixed(Severity::Debug)).ptr_eq(&kept));
    }

    #[test]
    fn test_sweep_keeps_live_sections() {
        let registry = SectionRegistry::new();
        let held: Vec<Section> = (0..200)
            .map(|i| registry.intern(&format!("held.{}", i), fixed(Severity::Info)))
            .collect();

        for i in 0..200 {
            let _ = registry.intern(&format!("gone.{}", i), fixed(Severity::Info));
        }

        assert_eq!(registry.len(), 200);
        assert!(registry.slot_count() <= 2 * held.len() + 1);
        for (i, section) in held.iter().enumerate() {
            let again = registry.intern(&format!("held.{}", i), fixed(Severity::Fatal));
            assert!(again.ptr_eq(section));
        }
    }

    #[test]
    fn test_recompute_skips_overridden() {
        let registry = SectionRegistry::new();
        let plain = registry.intern("plain", fixed(Severity::Info));
        let pinned = registry.intern("pinned", fixed(Severity::Info));
        pinned.set_level(Severity::Fatal);

        let updated = registry.recompute_all(fixed(Severity::Debug));

        assert_eq!(updated, 1);
        assert_eq!(plain.level(), Severity::Debug);
        assert_eq!(pinned.level(), Severity::Fatal);
    }

    #[test]
    fn test_clear_override() {
        let registry = SectionRegistry::new();
        let s = registry.intern("s", fixed(Severity::Info));

        assert!(!s.clear_override(Severity::Debug));
        assert_eq!(s.level(), Severity::Info);

        s.set_level(Severity::Error);
        assert!(s.clear_override(Severity::Debug));
        assert_eq!(s.level(), Severity::Debug);
        assert!(!s.is_overridden());
    }

    #[test]
    fn test_section_identity() {
        use std::collections::HashSet;

        let registry = SectionRegistry::new();
        let a = registry.intern("a", fixed(Severity::Info));
        let a2 = registry.intern("a", fixed(Severity::Info));
        let b = registry.intern("b", fixed(Severity::Info));

        let set: HashSet<Section> = [a.clone(), a2, b].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert_eq!(a.to_string(), "a");
    }
}
