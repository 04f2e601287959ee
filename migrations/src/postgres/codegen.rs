//! Builder-call fragments for model scaffolding
//!
//! A [`BuilderCall`] is the method call that would reproduce an annotation through the
//! configuration builders. Its `Display` output is a Rust method-call fragment meant to be
//! chained onto a builder expression, e.g. `.has_postgres_enum("mood", &["happy", "sad"])`.

use std::borrow::Cow;
use std::fmt;

use pgschema_types::postgres::ddl::{NullSortOrder, SortOrder};

/// One argument of a builder call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallArgument {
    Str(Cow<'static, str>),
    /// `Some("..")` / `None` for optional string parameters
    OptStr(Option<Cow<'static, str>>),
    StrList(Vec<Cow<'static, str>>),
    Bool(bool),
    SortOrders(Vec<SortOrder>),
    NullSortOrders(Vec<NullSortOrder>),
}

impl CallArgument {
    pub fn str(value: impl Into<Cow<'static, str>>) -> Self {
        Self::Str(value.into())
    }

    pub fn opt_str(value: Option<impl Into<Cow<'static, str>>>) -> Self {
        Self::OptStr(value.map(Into::into))
    }
}

impl fmt::Display for CallArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{}", rust_string(s)),
            Self::OptStr(Some(s)) => write!(f, "Some({})", rust_string(s)),
            Self::OptStr(None) => f.write_str("None"),
            Self::StrList(values) => {
                let items: Vec<_> = values.iter().map(|v| rust_string(v)).collect();
                write!(f, "&[{}]", items.join(", "))
            }
            Self::Bool(b) => write!(f, "{b}"),
            Self::SortOrders(orders) => {
                let items: Vec<_> = orders
                    .iter()
                    .map(|o| format!("SortOrder::{o:?}"))
                    .collect();
                write!(f, "&[{}]", items.join(", "))
            }
            Self::NullSortOrders(orders) => {
                let items: Vec<_> = orders
                    .iter()
                    .map(|o| format!("NullSortOrder::{o:?}"))
                    .collect();
                write!(f, "&[{}]", items.join(", "))
            }
        }
    }
}

/// A builder method with its ordered arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderCall {
    pub method: &'static str,
    pub arguments: Vec<CallArgument>,
}

impl BuilderCall {
    #[must_use]
    pub const fn new(method: &'static str) -> Self {
        Self {
            method,
            arguments: Vec::new(),
        }
    }

    #[must_use]
    pub fn arg(mut self, argument: CallArgument) -> Self {
        self.arguments.push(argument);
        self
    }
}

impl fmt::Display for BuilderCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}(", self.method)?;
        for (i, argument) in self.arguments.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{argument}")?;
        }
        f.write_str(")")
    }
}

/// Chain of calls on `receiver`, one per line
///
/// ```
/// use pgschema_migrations::postgres::{BuilderCall, CallArgument, render_chain};
///
/// let calls = [BuilderCall::new("has_postgres_extension").arg(CallArgument::str("hstore"))];
/// assert_eq!(
///     render_chain("model", &calls),
///     "model\n    .has_postgres_extension(\"hstore\");\n"
/// );
/// ```
#[must_use]
pub fn render_chain(receiver: &str, calls: &[BuilderCall]) -> String {
    let mut out = String::from(receiver);
    for call in calls {
        out.push_str("\n    ");
        out.push_str(&call.to_string());
    }
    out.push_str(";\n");
    out
}

/// Escaped Rust string literal
fn rust_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&c.escape_unicode().to_string()),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
