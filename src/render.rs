//! Static renderer: element tree in, [`RenderSnapshot`] out
//!
//! Depth-first walk over the tree. Components are expanded in place and never
//! show up in the output; intrinsic tags produce markup; text goes into both
//! projections. Mistakes in the tree description (props that are not an
//! object, bad tag names, object-valued attributes, children on void
//! elements) abort the render with [`Error::ConstructionError`]. Missing props are
//! never an error.

use std::borrow::Cow;
use std::fmt::Write as _;

use log::debug;
use serde_json::Value;

use crate::context::{ContextStack, Scope};
use crate::element::{Element, ElementType, Props};
use crate::{Error, RenderConfig, RenderOptions, RenderSnapshot, Result};

/// Tags serialized without a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Prop keys that never become attributes
const RESERVED_PROPS: &[&str] = &["children", "key", "ref"];

/// Render `node` with default options
pub fn render(node: &Element) -> Result<RenderSnapshot> {
    render_with(node, &RenderOptions::default())
}

/// Render `node` with context overrides and config from `options`
///
/// The overrides only exist for the duration of this call.
pub fn render_with(node: &Element, options: &RenderOptions) -> Result<RenderSnapshot> {
    options.config.validate()?;
    debug!(
        "render start ({} context override(s))",
        options.context.len()
    );

    let mut renderer = StaticRenderer::new(options);
    renderer.walk(node, 0)?;
    let snapshot = renderer.finish();

    debug!(
        "render done: {} bytes markup, {} bytes text",
        snapshot.markup().len(),
        snapshot.text().len()
    );
    Ok(snapshot)
}

struct StaticRenderer<'o> {
    config: &'o RenderConfig,
    stack: ContextStack,
    text: String,
    markup: String,
    // number of intrinsic elements currently open
    open_elements: usize,
    // items (elements or text) emitted at the top level
    top_level_items: usize,
    // inner markup range of the last top-level element
    root_inner: Option<(usize, usize)>,
}

impl<'o> StaticRenderer<'o> {
    fn new(options: &'o RenderOptions) -> Self {
        Self {
            config: &options.config,
            stack: ContextStack::with_overrides(&options.context),
            text: String::new(),
            markup: String::new(),
            open_elements: 0,
            top_level_items: 0,
            root_inner: None,
        }
    }

    fn walk(&mut self, el: &Element, depth: usize) -> Result<()> {
        if depth > self.config.max_depth {
            return Err(Error::RenderError(format!(
                "tree is deeper than max_depth ({})",
                self.config.max_depth
            )));
        }

        match el {
            Element::Empty => Ok(()),
            Element::Text(s) => {
                self.push_text(s);
                Ok(())
            }
            Element::Fragment(children) => self.walk_children(children, depth + 1),
            Element::Provider(provider) => {
                self.stack.push(provider.context, provider.value.clone());
                let res = self.walk_children(&provider.children, depth + 1);
                self.stack.pop();
                res
            }
            Element::Node(node) => match &node.kind {
                ElementType::Tag(tag) => self.intrinsic(tag, &node.props, depth),
                ElementType::Component(component) => {
                    check_props_shape(component.name(), &node.props)?;
                    let output = {
                        let scope = Scope::new(&self.stack, depth);
                        component.render(&node.props, &scope)
                    };
                    debug!("expanded component {} at depth {}", component.name(), depth);
                    self.walk(&output, depth + 1)
                }
            },
        }
    }

    fn walk_children(&mut self, children: &[Element], depth: usize) -> Result<()> {
        for child in children {
            self.walk(child, depth)?;
        }
        Ok(())
    }

    fn push_text(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        if self.open_elements == 0 {
            self.top_level_items += 1;
        }
        self.text.push_str(s);
        escape_into(s, false, &mut self.markup);
    }

    fn intrinsic(&mut self, tag: &str, props: &Props, depth: usize) -> Result<()> {
        validate_tag(tag)?;
        check_props_shape(tag, props)?;
        let children = child_elements(tag, props)?;
        let is_void = VOID_ELEMENTS.contains(&tag.to_ascii_lowercase().as_str());
        if is_void && !children.is_empty() {
            return Err(Error::ConstructionError(format!(
                "<{}> is a void element and cannot have children",
                tag
            )));
        }

        let at_top = self.open_elements == 0;
        if at_top {
            self.top_level_items += 1;
        }

        self.markup.push('<');
        self.markup.push_str(tag);
        write_attributes(tag, props, &mut self.markup)?;

        if is_void {
            self.markup
                .push_str(if self.config.void_elements_self_close { "/>" } else { ">" });
            if at_top {
                let end = self.markup.len();
                self.root_inner = Some((end, end));
            }
            return Ok(());
        }

        self.markup.push('>');
        let inner_start = self.markup.len();
        self.open_elements += 1;
        let res = self.walk_children(&children, depth + 1);
        self.open_elements -= 1;
        res?;
        let inner_end = self.markup.len();
        let _ = write!(self.markup, "</{}>", tag);

        if at_top {
            self.root_inner = Some((inner_start, inner_end));
        }
        Ok(())
    }

    fn finish(self) -> RenderSnapshot {
        let html = match self.root_inner {
            Some((start, end)) if self.top_level_items == 1 => self.markup[start..end].to_string(),
            _ => self.markup.clone(),
        };
        RenderSnapshot::new(self.text, self.markup, html)
    }
}

fn check_props_shape(owner: &str, props: &Props) -> Result<()> {
    match props.raw() {
        Value::Object(_) | Value::Null => Ok(()),
        other => Err(Error::ConstructionError(format!(
            "props for {} must be an object, got {}",
            owner,
            json_kind(other)
        ))),
    }
}

fn validate_tag(tag: &str) -> Result<()> {
    let valid = tag.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(Error::ConstructionError(format!("invalid tag name {:?}", tag)))
    }
}

/// Element children, falling back to a scalar `children` value in the props
fn child_elements<'p>(tag: &str, props: &'p Props) -> Result<Cow<'p, [Element]>> {
    if !props.children().is_empty() {
        return Ok(Cow::Borrowed(props.children()));
    }
    let children = match props.get("children") {
        None | Some(Value::Null) | Some(Value::Bool(_)) => Vec::new(),
        Some(Value::String(s)) => vec![Element::Text(s.clone())],
        Some(Value::Number(n)) => vec![Element::Text(n.to_string())],
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| scalar_child(tag, item))
            .collect::<Result<Vec<_>>>()?,
        Some(other) => {
            return Err(Error::ConstructionError(format!(
                "children of <{}> cannot be {}",
                tag,
                json_kind(other)
            )))
        }
    };
    Ok(Cow::Owned(children))
}

fn scalar_child(tag: &str, value: &Value) -> Result<Element> {
    match value {
        Value::Null | Value::Bool(_) => Ok(Element::Empty),
        Value::String(s) => Ok(Element::Text(s.clone())),
        Value::Number(n) => Ok(Element::Text(n.to_string())),
        other => Err(Error::ConstructionError(format!(
            "children of <{}> cannot contain {}",
            tag,
            json_kind(other)
        ))),
    }
}

fn write_attributes(tag: &str, props: &Props, out: &mut String) -> Result<()> {
    let map = match props.raw() {
        Value::Object(map) => map,
        _ => return Ok(()),
    };

    for (key, value) in map {
        if RESERVED_PROPS.contains(&key.as_str()) || props.has_handler(key) {
            continue;
        }
        validate_attribute(tag, key)?;
        let name = attribute_name(key);
        match value {
            Value::Null | Value::Bool(false) => {}
            Value::Bool(true) => {
                out.push(' ');
                out.push_str(name);
            }
            Value::String(s) => write_attribute(name, s, out),
            Value::Number(n) => write_attribute(name, &n.to_string(), out),
            Value::Object(style) if key == "style" => {
                let css = style_string(tag, style)?;
                if !css.is_empty() {
                    write_attribute(name, &css, out);
                }
            }
            other => {
                return Err(Error::ConstructionError(format!(
                    "attribute `{}` on <{}> cannot be {}",
                    key,
                    tag,
                    json_kind(other)
                )))
            }
        }
    }
    Ok(())
}

fn write_attribute(name: &str, value: &str, out: &mut String) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    escape_into(value, true, out);
    out.push('"');
}

fn validate_attribute(tag: &str, key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && !key.chars().any(|c| {
            c.is_whitespace()
                || c.is_control()
                || matches!(c, '"' | '\'' | '<' | '>' | '/' | '=')
        });
    if valid {
        Ok(())
    } else {
        Err(Error::ConstructionError(format!(
            "invalid attribute name {:?} on <{}>",
            key, tag
        )))
    }
}

fn attribute_name(key: &str) -> &str {
    match key {
        "className" => "class",
        "htmlFor" => "for",
        other => other,
    }
}

fn style_string(tag: &str, style: &serde_json::Map<String, Value>) -> Result<String> {
    let mut css = String::new();
    for (prop, value) in style {
        let value = match value {
            Value::Null | Value::Bool(false) => continue,
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            other => {
                return Err(Error::ConstructionError(format!(
                    "style `{}` on <{}> cannot be {}",
                    prop,
                    tag,
                    json_kind(other)
                )))
            }
        };
        for c in prop.chars() {
            if c.is_ascii_uppercase() {
                css.push('-');
                css.push(c.to_ascii_lowercase());
            } else {
                css.push(c);
            }
        }
        css.push(':');
        css.push_str(&value);
        css.push(';');
    }
    Ok(css)
}

fn escape_into(s: &str, attribute: bool, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
