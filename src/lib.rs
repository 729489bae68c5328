//! RFox Static Snapshot Renderer
//!
//! Describe a UI tree declaratively, render it without a browser, and assert
//! on its text and HTML. This is the "shallow mount" half of component
//! testing: no layout, no event loop, just a deterministic projection of the
//! tree.
//!
//! # Features
//!
//! - **Element trees**: intrinsic tags, text, fragments and closure components
//! - **Ambient context**: typed slots with defaults, per-render overrides and
//!   provider nodes, resolved through a render-scoped frame stack
//! - **Snapshots**: text and markup projections, CSS selector queries
//!   (`query` feature, default)
//! - **Harness**: `describe`/`it`/`expect` groups with isolated cases and a
//!   console or JSON report
//!
//! # Example
//!
//! ```
//! use rfsnap::{component, create_element, render, text, Element};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let foo = component("Foo", |props, _scope| {
//!     create_element("div", (), vec![
//!         create_element("div", (), vec![text("foo")]),
//!         create_element("h1", (), vec![Element::from(props.get_str("title"))]),
//!         create_element("button", (), vec![text("button")]),
//!     ])
//! });
//!
//! let snapshot = render(&create_element(&foo, json!({ "title": "test" }), vec![]))?;
//! assert_eq!(snapshot.text(), "footestbutton");
//! assert_eq!(snapshot.html(), "<div>foo</div><h1>test</h1><button>button</button>");
//! # Ok(())
//! # }
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod context;
pub mod element;
pub mod render;
pub mod snapshot;

// describe/it/expect test harness and reporters
pub mod harness;

// Example components and the suite run by the `rfsnap` binary
pub mod demo;

pub use context::{Context, ContextId, ContextOverrides, Scope};
pub use element::{
    component, create_element, fragment, text, Component, ComponentRef, Element, ElementNode,
    ElementType, Props,
};
pub use render::{render, render_with};
pub use snapshot::RenderSnapshot;

/// Configuration for a render call
///
/// The defaults are conservative: a generous depth limit that still stops a
/// component that renders itself forever, and HTML-style void elements.
///
/// # Examples
///
/// ```
/// let cfg = rfsnap::RenderConfig::default();
/// assert_eq!(cfg.max_depth, 512);
/// assert!(!cfg.void_elements_self_close);
/// ```
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Maximum tree depth (tags, fragments, providers and component expansions)
    /// before rendering fails
    pub max_depth: usize,
    /// Emit `<br/>` instead of `<br>` for void elements
    pub void_elements_self_close: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_depth: 512,
            void_elements_self_close: false,
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(Error::ConfigError("max_depth must be at least 1".into()));
        }
        Ok(())
    }
}

/// Options for [`render_with`]
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Context overrides active for this render only
    pub context: ContextOverrides,
    pub config: RenderConfig,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override `context` with `value` for this render
    pub fn with_context<T>(mut self, context: &Context<T>, value: T) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        self.context.insert(context, value);
        self
    }

    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RenderConfig::default();
        assert_eq!(config.max_depth, 512);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_depth_is_rejected() {
        let config = RenderConfig {
            max_depth: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_options_collect_overrides() {
        let ctx = Context::new(1u8);
        let opts = RenderOptions::new().with_context(&ctx, 2);
        assert!(opts.context.contains(&ctx));
        assert_eq!(opts.context.len(), 1);
    }
}
