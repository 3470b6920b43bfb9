#![forbid(unsafe_code)]

//! The marker map: per-component validity for one form scope.
//!
//! A [`MarkerMap`] records the last validity flag reported by each validator
//! in a scope and answers three questions:
//!
//! - which style class applies to a component ([`MarkerMap::get`])
//! - what is known about a component ([`MarkerMap::status`])
//! - whether the whole scope is valid ([`MarkerMap::validate_all`])
//!
//! # Invariants
//!
//! 1. A key is present iff that component reported at least once since the
//!    map was created. Nothing removes keys.
//! 2. Absent keys are *unknown*, not invalid. Styling fails closed and maps
//!    them to the invalid class, so only [`MarkerMap::status`] tells the two
//!    apart.
//! 3. `validate_all` scans every entry on each call; there is no cached
//!    aggregate to go stale.
//! 4. Each `set` updates the entry before any callback runs, so callbacks
//!    observe the updated map.
//!
//! # Threading
//!
//! `MarkerMap` is a plain owned value mutated through `&mut self`. Share it
//! across validators (or threads) with [`SharedMarkerMap`], which serialises
//! every operation behind a mutex.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::MarkerMapOptions;
use crate::error::{ConfigError, ConfigResult};
use crate::event::ValidationEvent;

/// Prefix for ids handed out by [`MarkerMap::allocate_id`].
pub const ALLOCATED_ID_PREFIX: &str = "validator-";

// ---------------------------------------------------------------------------
// MarkerStatus
// ---------------------------------------------------------------------------

/// What the map knows about one component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MarkerStatus {
    /// Last evaluation passed.
    Valid,
    /// Last evaluation failed.
    Invalid,
    /// Never evaluated in this scope.
    Unknown,
}

impl MarkerStatus {
    fn from_flag(flag: Option<bool>) -> Self {
        match flag {
            Some(true) => Self::Valid,
            Some(false) => Self::Invalid,
            None => Self::Unknown,
        }
    }

    /// Returns `true` for [`MarkerStatus::Valid`].
    #[must_use]
    pub fn is_valid(self) -> bool {
        self == Self::Valid
    }

    /// Returns `false` for [`MarkerStatus::Unknown`].
    #[must_use]
    pub fn is_known(self) -> bool {
        self != Self::Unknown
    }
}

// ---------------------------------------------------------------------------
// Callbacks
// ---------------------------------------------------------------------------

/// Callback invoked with the exact event passed to [`MarkerMap::set`].
pub type ChangeCallback = Box<dyn FnMut(&ValidationEvent) + Send>;

/// Observer invoked after every [`MarkerMap::set`].
pub type MarkerListener = Box<dyn FnMut(&MarkerChange<'_>) + Send>;

/// Identifies a listener registered with [`MarkerMap::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Get the raw id value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Notification delivered to subscribers after a `set`.
#[derive(Debug, Clone, Copy)]
pub struct MarkerChange<'a> {
    /// The component that reported.
    pub component_id: &'a str,
    /// The event it reported.
    pub event: &'a ValidationEvent,
    /// Status before this update.
    pub previous: MarkerStatus,
    /// Result of `validate_all` after this update.
    pub all_valid: bool,
}

impl MarkerChange<'_> {
    /// Whether the component's stored status changed.
    #[must_use]
    pub fn status_changed(&self) -> bool {
        self.previous != MarkerStatus::from_flag(Some(self.event.is_valid()))
    }
}

/// Entry counts by stored status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkerCounts {
    /// Components whose last event passed.
    pub valid: usize,
    /// Components whose last event failed.
    pub invalid: usize,
}

// ---------------------------------------------------------------------------
// MarkerMap
// ---------------------------------------------------------------------------

/// Keyed validity store for one validation scope.
///
/// # Example
///
/// ```rust
/// use vmark_core::{MarkerMap, MarkerMapOptions, MarkerStatus, ValidationEvent};
///
/// let mut map = MarkerMap::new(MarkerMapOptions::new("err").class_name_valid("ok")).unwrap();
/// map.set("f1", &ValidationEvent::valid("x"));
///
/// assert_eq!(map.get("f1"), Some("ok"));
/// assert_eq!(map.get("f2"), Some("err"));
/// assert_eq!(map.status("f2"), MarkerStatus::Unknown);
/// assert!(map.validate_all());
/// ```
pub struct MarkerMap {
    markers: HashMap<String, bool>,
    class_name_invalid: String,
    class_name_valid: Option<String>,
    on_changed: Option<ChangeCallback>,
    listeners: Vec<(SubscriptionId, MarkerListener)>,
    next_subscription: u64,
    next_component: u64,
}

impl fmt::Debug for MarkerMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkerMap")
            .field("markers", &self.markers)
            .field("class_name_invalid", &self.class_name_invalid)
            .field("class_name_valid", &self.class_name_valid)
            .field("has_on_changed", &self.on_changed.is_some())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl MarkerMap {
    /// Create a map from validated options.
    ///
    /// Fails with the first violation reported by
    /// [`MarkerMapOptions::validate`], so a blank `class_name_invalid` is
    /// caught here rather than surfacing as an empty style later.
    pub fn new(options: MarkerMapOptions) -> ConfigResult<Self> {
        if let Err(errors) = options.validate() {
            crate::warn!(count = errors.len(), "marker map options rejected");
            return Err(errors
                .into_iter()
                .next()
                .unwrap_or(ConfigError::MissingClassNameInvalid));
        }
        Ok(Self {
            markers: HashMap::new(),
            class_name_invalid: options.class_name_invalid,
            class_name_valid: options.class_name_valid,
            on_changed: None,
            listeners: Vec::new(),
            next_subscription: 1,
            next_component: 1,
        })
    }

    /// Attach the change callback.
    #[must_use]
    pub fn with_on_changed(
        mut self,
        callback: impl FnMut(&ValidationEvent) + Send + 'static,
    ) -> Self {
        self.on_changed = Some(Box::new(callback));
        self
    }

    /// Replace (or clear) the change callback.
    pub fn set_on_changed(&mut self, callback: Option<ChangeCallback>) {
        self.on_changed = callback;
    }

    /// Class used for invalid and unknown ids.
    #[must_use]
    pub fn class_name_invalid(&self) -> &str {
        &self.class_name_invalid
    }

    /// Class used for valid ids, if configured.
    #[must_use]
    pub fn class_name_valid(&self) -> Option<&str> {
        self.class_name_valid.as_deref()
    }

    // -- Read protocol -------------------------------------------------------

    /// Style class for `component_id`.
    ///
    /// Valid ids get `class_name_valid` (which may be unset); invalid and
    /// never-seen ids get `class_name_invalid`.
    #[must_use]
    pub fn get(&self, component_id: &str) -> Option<&str> {
        match self.markers.get(component_id) {
            Some(true) => self.class_name_valid.as_deref(),
            Some(false) | None => Some(&self.class_name_invalid),
        }
    }

    /// Tri-state status for `component_id`.
    #[must_use]
    pub fn status(&self, component_id: &str) -> MarkerStatus {
        MarkerStatus::from_flag(self.markers.get(component_id).copied())
    }

    /// Whether `component_id` has reported at least once.
    #[must_use]
    pub fn contains(&self, component_id: &str) -> bool {
        self.markers.contains_key(component_id)
    }

    /// Number of components that have reported.
    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Whether no component has reported yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Ids currently marked invalid, sorted.
    #[must_use]
    pub fn invalid_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .markers
            .iter()
            .filter(|(_, valid)| !**valid)
            .map(|(id, _)| id.as_str())
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Entry counts by stored status.
    #[must_use]
    pub fn counts(&self) -> MarkerCounts {
        let valid = self.markers.values().filter(|v| **v).count();
        MarkerCounts {
            valid,
            invalid: self.markers.len() - valid,
        }
    }

    // -- Reduction protocol --------------------------------------------------

    /// `true` iff every stored flag is `true`. Vacuously `true` when empty.
    #[must_use]
    pub fn validate_all(&self) -> bool {
        let all_valid = self.markers.values().all(|valid| *valid);
        crate::debug!(entries = self.markers.len(), all_valid, "validate_all");
        all_valid
    }

    // -- Update protocol -----------------------------------------------------

    /// Record `event` for `component_id`.
    ///
    /// Only `event.is_valid()` is stored. After the entry is updated the
    /// `on_changed` callback (if any) receives `event`, then every subscriber
    /// receives a [`MarkerChange`].
    pub fn set(&mut self, component_id: &str, event: &ValidationEvent) {
        let span = crate::debug_span!("marker_map.set", component_id);
        let _guard = span.enter();

        let is_valid = event.is_valid();
        let previous = match self.markers.get_mut(component_id) {
            Some(slot) => MarkerStatus::from_flag(Some(std::mem::replace(slot, is_valid))),
            None => {
                self.markers.insert(component_id.to_owned(), is_valid);
                MarkerStatus::Unknown
            }
        };
        crate::trace!(component_id, is_valid, ?previous, "marker set");

        if let Some(callback) = self.on_changed.as_mut() {
            callback(event);
        }

        if self.listeners.is_empty() {
            return;
        }
        let change = MarkerChange {
            component_id,
            event,
            previous,
            all_valid: self.markers.values().all(|valid| *valid),
        };
        for (_, listener) in &mut self.listeners {
            listener(&change);
        }
    }

    // -- Subscriptions -------------------------------------------------------

    /// Register an observer called after every `set`.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&MarkerChange<'_>) + Send + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        crate::debug!(subscription = id.raw(), "marker listener subscribed");
        id
    }

    /// Remove an observer. Returns `false` if `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        let removed = self.listeners.len() != before;
        crate::debug!(subscription = id.raw(), removed, "marker listener unsubscribed");
        removed
    }

    /// Number of registered observers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    // -- Identity ------------------------------------------------------------

    /// Hand out a fresh component id (`validator-1`, `validator-2`, ...).
    ///
    /// Ids are never repeated by one map and skip any id a caller has already
    /// reported under. Caller-chosen ids are not checked for collisions.
    pub fn allocate_id(&mut self) -> String {
        loop {
            let id = format!("{ALLOCATED_ID_PREFIX}{}", self.next_component);
            self.next_component += 1;
            if !self.markers.contains_key(&id) {
                return id;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// SharedMarkerMap
// ---------------------------------------------------------------------------

/// A cloneable, thread-safe handle to a [`MarkerMap`].
///
/// Every validator in a scope holds a clone; the scope owner keeps one to
/// query `validate_all` at submit time. Each call takes the lock for its whole
/// duration, including callbacks, so a `set` is never observed half-applied.
///
/// Callbacks run while the lock is held and must not call back into the same
/// handle; [`MarkerChange::all_valid`] carries the aggregate they usually need.
#[derive(Clone)]
pub struct SharedMarkerMap {
    inner: Arc<Mutex<MarkerMap>>,
}

impl fmt::Debug for SharedMarkerMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedMarkerMap").field(&*self.lock()).finish()
    }
}

impl From<MarkerMap> for SharedMarkerMap {
    fn from(map: MarkerMap) -> Self {
        Self::new(map)
    }
}

impl SharedMarkerMap {
    /// Wrap a map for sharing.
    #[must_use]
    pub fn new(map: MarkerMap) -> Self {
        Self {
            inner: Arc::new(Mutex::new(map)),
        }
    }

    /// Build the map from options and wrap it.
    pub fn from_options(options: MarkerMapOptions) -> ConfigResult<Self> {
        MarkerMap::new(options).map(Self::new)
    }

    // A panic inside a callback poisons the lock; the map itself is still
    // consistent because the entry is written before callbacks run.
    fn lock(&self) -> MutexGuard<'_, MarkerMap> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with exclusive access to the map.
    pub fn with<R>(&self, f: impl FnOnce(&mut MarkerMap) -> R) -> R {
        f(&mut *self.lock())
    }

    /// See [`MarkerMap::get`].
    #[must_use]
    pub fn get(&self, component_id: &str) -> Option<String> {
        self.lock().get(component_id).map(str::to_owned)
    }

    /// See [`MarkerMap::status`].
    #[must_use]
    pub fn status(&self, component_id: &str) -> MarkerStatus {
        self.lock().status(component_id)
    }

    /// See [`MarkerMap::set`].
    pub fn set(&self, component_id: &str, event: &ValidationEvent) {
        self.lock().set(component_id, event);
    }

    /// Record `event` and return the resulting style class in one locked step.
    pub fn set_and_get(&self, component_id: &str, event: &ValidationEvent) -> Option<String> {
        let mut map = self.lock();
        map.set(component_id, event);
        map.get(component_id).map(str::to_owned)
    }

    /// See [`MarkerMap::validate_all`].
    #[must_use]
    pub fn validate_all(&self) -> bool {
        self.lock().validate_all()
    }

    /// See [`MarkerMap::invalid_ids`].
    #[must_use]
    pub fn invalid_ids(&self) -> Vec<String> {
        self.lock()
            .invalid_ids()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    /// See [`MarkerMap::len`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// See [`MarkerMap::is_empty`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// See [`MarkerMap::subscribe`].
    pub fn subscribe(
        &self,
        listener: impl FnMut(&MarkerChange<'_>) + Send + 'static,
    ) -> SubscriptionId {
        self.lock().subscribe(listener)
    }

    /// See [`MarkerMap::unsubscribe`].
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.lock().unsubscribe(id)
    }

    /// See [`MarkerMap::allocate_id`].
    pub fn allocate_id(&self) -> String {
        self.lock().allocate_id()
    }

    /// Whether two handles point at the same map.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
