//! Declarative element trees
//!
//! An [`Element`] describes a piece of UI: literal text, an intrinsic tag
//! (`div`, `h1`, ...), a component reference, or a context provider. Trees
//! are immutable once built; [`create_element`] stores whatever it is given
//! and leaves validation to the renderer.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::context::{ContextId, Scope, SlotValue};

/// Something that can turn props into a subtree
///
/// Any `Fn(&Props, &Scope) -> Element` closure is a component; use
/// [`component`] to give one a name for diagnostics.
pub trait Component: Send + Sync {
    fn render(&self, props: &Props, scope: &Scope<'_>) -> Element;

    fn name(&self) -> &str {
        "Anonymous"
    }
}

impl<F> Component for F
where
    F: Fn(&Props, &Scope<'_>) -> Element + Send + Sync,
{
    fn render(&self, props: &Props, scope: &Scope<'_>) -> Element {
        self(props, scope)
    }
}

struct Named<F> {
    name: String,
    render: F,
}

impl<F> Component for Named<F>
where
    F: Fn(&Props, &Scope<'_>) -> Element + Send + Sync,
{
    fn render(&self, props: &Props, scope: &Scope<'_>) -> Element {
        (self.render)(props, scope)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Shared handle to a component
pub type ComponentRef = Arc<dyn Component>;

/// Wrap a closure into a named component
///
/// # Examples
///
/// ```
/// use rfsnap::{component, create_element, render, Element};
///
/// let greeting = component("Greeting", |props, _scope| {
///     create_element("p", (), vec![Element::from(props.get_str("who"))])
/// });
/// let tree = create_element(&greeting, serde_json::json!({ "who": "world" }), vec![]);
/// assert_eq!(render(&tree).unwrap().markup(), "<p>world</p>");
/// ```
pub fn component<F>(name: impl Into<String>, render: F) -> ComponentRef
where
    F: Fn(&Props, &Scope<'_>) -> Element + Send + Sync + 'static,
{
    Arc::new(Named {
        name: name.into(),
        render,
    })
}

/// Event handler attached to a prop such as `onClick`
pub type Handler = Arc<dyn Fn() + Send + Sync>;

/// Named inputs of an element
///
/// Values are kept as a raw JSON value. It is expected to be an object (or
/// null for "no props"); anything else is stored as-is and rejected when the
/// element is rendered. Handlers and children live next to the values.
#[derive(Clone, Default)]
pub struct Props {
    values: Value,
    handlers: BTreeMap<String, Handler>,
    children: Vec<Element>,
}

impl Props {
    /// Empty props object
    pub fn new() -> Self {
        Self {
            values: Value::Object(Map::new()),
            ..Default::default()
        }
    }

    /// Set a value. Null props become an object first; a malformed (non-object)
    /// value is left untouched so the renderer can report it.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        if self.values.is_null() {
            self.values = Value::Object(Map::new());
        }
        if let Value::Object(map) = &mut self.values {
            map.insert(key.into(), value.into());
        }
        self
    }

    /// Attach an event handler. Static rendering never calls or emits it.
    pub fn on<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.handlers.insert(name.into(), Arc::new(handler));
        self
    }

    pub fn with_children<C>(mut self, children: C) -> Self
    where
        C: IntoIterator<Item = Element>,
    {
        self.children = children.into_iter().collect();
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// Element children; an absent children list is empty
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn handler(&self, name: &str) -> Option<&Handler> {
        self.handlers.get(name)
    }

    pub fn has_handler(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Invoke the handler registered under `name`, if any
    pub fn call(&self, name: &str) -> bool {
        match self.handlers.get(name) {
            Some(handler) => {
                handler();
                true
            }
            None => false,
        }
    }

    /// The raw props value as it was supplied
    pub fn raw(&self) -> &Value {
        &self.values
    }
}

impl From<Value> for Props {
    fn from(values: Value) -> Self {
        Self {
            values,
            ..Default::default()
        }
    }
}

impl From<Map<String, Value>> for Props {
    fn from(map: Map<String, Value>) -> Self {
        Value::Object(map).into()
    }
}

impl From<()> for Props {
    fn from(_: ()) -> Self {
        Self::default()
    }
}

impl fmt::Debug for Props {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Props")
            .field("values", &self.values)
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .field("children", &self.children)
            .finish()
    }
}

/// Tag-or-component identity of a node
#[derive(Clone)]
pub enum ElementType {
    /// Intrinsic tag such as `div`
    Tag(String),
    /// Component that expands into another subtree
    Component(ComponentRef),
}

impl From<&str> for ElementType {
    fn from(tag: &str) -> Self {
        ElementType::Tag(tag.to_string())
    }
}

impl From<String> for ElementType {
    fn from(tag: String) -> Self {
        ElementType::Tag(tag)
    }
}

impl From<ComponentRef> for ElementType {
    fn from(c: ComponentRef) -> Self {
        ElementType::Component(c)
    }
}

impl From<&ComponentRef> for ElementType {
    fn from(c: &ComponentRef) -> Self {
        ElementType::Component(c.clone())
    }
}

impl fmt::Debug for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementType::Tag(tag) => write!(f, "<{}>", tag),
            ElementType::Component(c) => write!(f, "{}", c.name()),
        }
    }
}

/// A tag or component together with its props
#[derive(Clone, Debug)]
pub struct ElementNode {
    pub kind: ElementType,
    pub props: Props,
}

/// Context provider; see [`crate::Context::provide`]
#[derive(Clone)]
pub struct ProviderNode {
    pub(crate) context: ContextId,
    pub(crate) value: SlotValue,
    pub(crate) children: Vec<Element>,
}

impl ProviderNode {
    pub fn context(&self) -> ContextId {
        self.context
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }
}

impl fmt::Debug for ProviderNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderNode")
            .field("context", &self.context)
            .field("children", &self.children)
            .finish()
    }
}

/// One node of a declarative tree
#[derive(Clone, Debug, Default)]
pub enum Element {
    /// Renders nothing
    #[default]
    Empty,
    /// Literal text
    Text(String),
    /// Children without wrapper markup
    Fragment(Vec<Element>),
    Node(Box<ElementNode>),
    Provider(Box<ProviderNode>),
}

impl Element {
    pub fn is_empty(&self) -> bool {
        matches!(self, Element::Empty)
    }

    /// Tag name for intrinsic nodes
    pub fn tag(&self) -> Option<&str> {
        match self {
            Element::Node(node) => match &node.kind {
                ElementType::Tag(tag) => Some(tag.as_str()),
                ElementType::Component(_) => None,
            },
            _ => None,
        }
    }

    pub fn props(&self) -> Option<&Props> {
        match self {
            Element::Node(node) => Some(&node.props),
            _ => None,
        }
    }
}

impl From<&str> for Element {
    fn from(s: &str) -> Self {
        Element::Text(s.to_string())
    }
}

impl From<String> for Element {
    fn from(s: String) -> Self {
        Element::Text(s)
    }
}

impl<T: Into<Element>> From<Option<T>> for Element {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

impl From<Vec<Element>> for Element {
    fn from(children: Vec<Element>) -> Self {
        Element::Fragment(children)
    }
}

macro_rules! text_from_number {
    ($($t:ty),*) => {
        $(impl From<$t> for Element {
            fn from(n: $t) -> Self {
                Element::Text(n.to_string())
            }
        })*
    };
}

text_from_number!(i32, i64, u32, u64, usize, f64);

/// Describe an element. Never fails: bad props or tags are reported by the
/// renderer. Non-empty `children` replace any children already in `props`.
pub fn create_element<K, P, C>(kind: K, props: P, children: C) -> Element
where
    K: Into<ElementType>,
    P: Into<Props>,
    C: IntoIterator<Item = Element>,
{
    let mut props = props.into();
    let children: Vec<Element> = children.into_iter().collect();
    if !children.is_empty() {
        props.children = children;
    }
    Element::Node(Box::new(ElementNode {
        kind: kind.into(),
        props,
    }))
}

/// Literal text node
pub fn text(s: impl Into<String>) -> Element {
    Element::Text(s.into())
}

pub fn fragment<C>(children: C) -> Element
where
    C: IntoIterator<Item = Element>,
{
    Element::Fragment(children.into_iter().collect())
}
