use super::Expr;
use crate::stack::ensure_sufficient_stack;
use crate::value::Value;

use std::fmt;

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pretty_print())
    }
}

impl Expr {
    /// Fully parenthesised prefix form, e.g. `(* (- 123.0) (group 45.67))`.
    pub fn pretty_print(&self) -> String {
        ensure_sufficient_stack(|| match self {
            Self::Literal { value, .. } => literal(value),
            Self::Group(expr) => parenthesise("group", &[expr.as_ref()]),
            Self::Unary { op, expr } => parenthesise(&op.lexeme, &[expr.as_ref()]),
            Self::Binary { left, op, right } | Self::Logical { left, op, right } => {
                parenthesise(&op.lexeme, &[left.as_ref(), right.as_ref()])
            }
            Self::Variable(name) => name.lexeme.clone(),
            Self::Assign { name, value } => {
                parenthesise(&format!("= {}", name.lexeme), &[value.as_ref()])
            }
            Self::Call { callee, args, .. } => {
                let mut exprs = vec![callee.as_ref()];
                exprs.extend(args.iter());
                parenthesise("call", &exprs)
            }
            Self::Get { object, name } => {
                parenthesise(&format!(". {}", name.lexeme), &[object.as_ref()])
            }
            Self::Set {
                object,
                name,
                value,
            } => parenthesise(
                &format!("= .{}", name.lexeme),
                &[object.as_ref(), value.as_ref()],
            ),
            Self::This(_) => "this".to_string(),
            Self::Super { method, .. } => format!("(super {})", method.lexeme),
        })
    }

    /// Infix source text that parses back to the same tree.
    pub fn to_source(&self) -> String {
        ensure_sufficient_stack(|| match self {
            Self::Literal { value, .. } => match value {
                Value::String(s) => format!("\"{}\"", s),
                other => other.to_string(),
            },
            Self::Group(expr) => format!("({})", expr.to_source()),
            Self::Unary { op, expr } => format!("{}{}", op.lexeme, expr.to_source()),
            Self::Binary { left, op, right } | Self::Logical { left, op, right } => {
                format!("{} {} {}", left.to_source(), op.lexeme, right.to_source())
            }
            Self::Variable(name) => name.lexeme.clone(),
            Self::Assign { name, value } => format!("{} = {}", name.lexeme, value.to_source()),
            Self::Call { callee, args, .. } => {
                let args: Vec<String> = args.iter().map(Expr::to_source).collect();
                format!("{}({})", callee.to_source(), args.join(", "))
            }
            Self::Get { object, name } => format!("{}.{}", object.to_source(), name.lexeme),
            Self::Set {
                object,
                name,
                value,
            } => format!("{}.{} = {}", object.to_source(), name.lexeme, value.to_source()),
            Self::This(_) => "this".to_string(),
            Self::Super { method, .. } => format!("super.{}", method.lexeme),
        })
    }
}

// Numbers always show a fractional digit in the tree dump.
fn literal(value: &Value) -> String {
    match value {
        Value::Number(n) if n.fract() == 0.0 => format!("{:.1}", n),
        other => other.to_string(),
    }
}

fn parenthesise(op: &str, exprs: &[&Expr]) -> String {
    let mut out = format!("({}", op);

    for expr in exprs {
        out.push(' ');
        out.push_str(&expr.pretty_print());
    }

    out.push(')');
    out
}
