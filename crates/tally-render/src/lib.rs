//! Rendering for the tally template engine.
//!
//! [`Template`] ties the pipeline together: source text is parsed by
//! `tally-templates` into a node tree, and rendering walks that tree
//! depth-first against a [`Context`] — a stack of variable scopes plus the
//! sink frames backing any `collect` blocks currently open.
//!
//! ## The accumulator protocol
//!
//! `{% collect name [keyed] %}` installs a fresh [`Sink`] (a sequence or a
//! string-keyed mapping), renders its body for side effects only, then
//! publishes the finalized collection as an ordinary variable named `name`
//! in the enclosing scope. `{% append value into name [keyed key] %}`
//! writes to the innermost active sink with that name and renders nothing.
//! Absent values are skipped; keyed/unkeyed disagreement, non-string keys,
//! and appends with no matching open block are hard errors.
//!
//! ## Example
//!
//! ```
//! use tally_render::Context;
//! use tally_render::Template;
//!
//! let template = Template::parse(
//!     r#"{% collect c %}{% append "a" into c %}{% append "b" into c %}{% endcollect %}{{ c|join:"," }}"#,
//! )
//! .unwrap();
//! let mut context = Context::new();
//! assert_eq!(template.render(&mut context).unwrap(), "a,b");
//! ```

mod context;
mod error;
mod filters;
mod renderer;
mod resolve;
mod sink;
pub mod value;

pub use context::Context;
pub use error::RenderError;
pub use error::TemplateError;
pub use sink::Sink;
pub use value::Map;
pub use value::Value;

use tally_templates::nodelist::Node;

/// A parsed template, ready to render any number of times.
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let nodes = tally_templates::parse(source)?;
        Ok(Self { nodes })
    }

    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn render(&self, context: &mut Context) -> Result<String, TemplateError> {
        renderer::render(&self.nodes, context).map_err(TemplateError::from)
    }
}
