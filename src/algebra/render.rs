//! Turning an [`Expression`] into code for some other expression evaluator.

use crate::algebra::Expression;
use smol_str::SmolStr;

/// Decides how each operand gets written out by [`render()`].
pub trait Renderer {
    fn render_number(&self, text: &str) -> String { text.to_string() }

    fn render_variable(&self, name: &str) -> String;
}

/// Render an [`Expression`] in the same fully parenthesized shape as its
/// [`Display`][std::fmt::Display] impl, letting the [`Renderer`] decide
/// what operands look like.
pub fn render<R>(expr: &Expression, renderer: &R) -> String
where
    R: Renderer + ?Sized,
{
    match expr {
        Expression::Number(text) => renderer.render_number(text),
        Expression::Variable(name) => renderer.render_variable(name),
        Expression::Binary { left, right, op } => format!(
            "({} {} {})",
            render(left, renderer),
            op,
            render(right, renderer)
        ),
    }
}

/// A [`Renderer`] for hosts which mark variables with a sigil (e.g. `$x`),
/// apart from a handful of builtin named constants.
#[derive(Debug, Clone, PartialEq)]
pub struct HostRenderer {
    pub sigil: SmolStr,
    /// Only names starting with this prefix may refer to a constant.
    pub constant_prefix: SmolStr,
    pub constants: Vec<SmolStr>,
}

impl HostRenderer {
    fn is_constant(&self, name: &str) -> bool {
        name.starts_with(self.constant_prefix.as_str())
            && self.constants.iter().any(|c| c.as_str() == name)
    }
}

impl Default for HostRenderer {
    fn default() -> Self {
        HostRenderer {
            sigil: "$".into(),
            constant_prefix: "M_".into(),
            constants: ["M_PI", "M_E", "M_SQRT2", "M_LN2", "M_LN10"]
                .iter()
                .map(|&name| SmolStr::new(name))
                .collect(),
        }
    }
}

impl Renderer for HostRenderer {
    fn render_variable(&self, name: &str) -> String {
        if self.is_constant(name) {
            name.to_string()
        } else {
            format!("{}{}", self.sigil, name)
        }
    }
}
