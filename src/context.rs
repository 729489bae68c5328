//! Ambient context slots
//!
//! A [`Context`] is a typed slot with a default value. Components read it
//! through the [`Scope`] handed to them by the renderer, so values never have
//! to be threaded through intermediate props. Overrides come from two places:
//!
//! - [`ContextOverrides`] passed in the render options, keyed by slot identity
//! - provider nodes built with [`Context::provide`], which shadow everything
//!   outside them for their own subtree
//!
//! All lookups go through a frame stack owned by a single render call. The
//! stack is dropped when the render finishes, so nothing leaks between renders.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::trace;

use crate::element::{Element, ProviderNode};

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a context slot, unique per [`Context::new`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(u64);

impl ContextId {
    fn next() -> Self {
        ContextId(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ctx#{}", self.0)
    }
}

pub(crate) type SlotValue = Arc<dyn Any + Send + Sync>;

/// A typed context slot with a default value
///
/// # Examples
///
/// ```
/// use rfsnap::Context;
///
/// let theme = Context::new("light".to_string());
/// let other = Context::new("light".to_string());
/// assert_ne!(theme.id(), other.id());
/// assert_eq!(theme.default_value(), "light");
/// ```
pub struct Context<T> {
    id: ContextId,
    default: Arc<T>,
}

impl<T> Clone for Context<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            default: self.default.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Context<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("id", &self.id)
            .field("default", &self.default)
            .finish()
    }
}

impl<T> Context<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Register a new slot holding `default`
    pub fn new(default: T) -> Self {
        Self {
            id: ContextId::next(),
            default: Arc::new(default),
        }
    }

    pub fn id(&self) -> ContextId {
        self.id
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }

    /// Build a provider node: every descendant of `children` reads `value`
    /// from this slot instead of the outer value.
    pub fn provide<C>(&self, value: T, children: C) -> Element
    where
        C: IntoIterator<Item = Element>,
    {
        Element::Provider(Box::new(ProviderNode {
            context: self.id,
            value: Arc::new(value),
            children: children.into_iter().collect(),
        }))
    }
}

/// Per-render context overrides, keyed by slot identity
#[derive(Clone, Default)]
pub struct ContextOverrides {
    values: HashMap<ContextId, SlotValue>,
}

impl ContextOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`ContextOverrides::insert`]
    pub fn with<T>(mut self, context: &Context<T>, value: T) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        self.insert(context, value);
        self
    }

    /// Override `context` for the render these overrides are passed to.
    /// Returns true when a previous override for the same slot was replaced.
    pub fn insert<T>(&mut self, context: &Context<T>, value: T) -> bool
    where
        T: Clone + Send + Sync + 'static,
    {
        self.values.insert(context.id, Arc::new(value)).is_some()
    }

    pub fn contains<T>(&self, context: &Context<T>) -> bool {
        self.values.contains_key(&context.id)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for ContextOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self.values.keys().collect();
        ids.sort();
        f.debug_struct("ContextOverrides").field("slots", &ids).finish()
    }
}

/// Frame stack used while a single render is in progress
#[derive(Default)]
pub(crate) struct ContextStack {
    frames: Vec<HashMap<ContextId, SlotValue>>,
}

impl ContextStack {
    /// Start a stack whose outermost frame holds the render overrides
    pub(crate) fn with_overrides(overrides: &ContextOverrides) -> Self {
        Self {
            frames: vec![overrides.values.clone()],
        }
    }

    pub(crate) fn push(&mut self, context: ContextId, value: SlotValue) {
        let mut frame = HashMap::with_capacity(1);
        frame.insert(context, value);
        self.frames.push(frame);
    }

    pub(crate) fn pop(&mut self) {
        self.frames.pop();
    }

    pub(crate) fn depth(&self) -> usize {
        self.frames.len()
    }

    fn lookup(&self, context: ContextId) -> Option<&SlotValue> {
        self.frames.iter().rev().find_map(|frame| frame.get(&context))
    }
}

/// Read-only view of the render state handed to components
pub struct Scope<'a> {
    stack: &'a ContextStack,
    depth: usize,
}

impl<'a> Scope<'a> {
    pub(crate) fn new(stack: &'a ContextStack, depth: usize) -> Self {
        Self { stack, depth }
    }

    /// Read the current value of `context`: the nearest provider, then the
    /// render overrides, then the slot default.
    pub fn use_context<T>(&self, context: &Context<T>) -> T
    where
        T: Clone + Send + Sync + 'static,
    {
        match self
            .stack
            .lookup(context.id)
            .and_then(|v| v.downcast_ref::<T>())
        {
            Some(value) => {
                trace!("{} resolved from an override", context.id);
                value.clone()
            }
            None => {
                trace!("{} resolved to its default", context.id);
                (*context.default).clone()
            }
        }
    }

    /// Tree depth of the component currently rendering
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl fmt::Debug for Scope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("depth", &self.depth)
            .field("frames", &self.stack.depth())
            .finish()
    }
}
