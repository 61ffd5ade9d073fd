use std::fmt::{self, Write};

/// One line inside the `digraph { ... }` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `node [shape=...];` defaults for every following node.
    NodeDefaults { shape: String },
    /// A vertex with its attributes, in insertion order.
    Node {
        id: String,
        attrs: Vec<(String, String)>,
    },
    /// `from -> to;`
    Edge { from: String, to: String },
}

/// Minimal DOT writer: a named or anonymous digraph with flat statements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DotDocument {
    name: Option<String>,
    statements: Vec<Statement>,
}

impl DotDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn push(&mut self, statement: Statement) {
        self.statements.push(statement);
    }

    #[must_use]
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Write the document, one statement per line with two-space indent.
    pub fn write_to_string(&self, output: &mut String) {
        match &self.name {
            Some(name) => {
                let _ = write!(output, "digraph {} {{", quote_id(name));
            }
            None => output.push_str("digraph {"),
        }

        for statement in &self.statements {
            output.push_str("\n  ");
            match statement {
                Statement::NodeDefaults { shape } => {
                    let _ = write!(output, "node [shape={}];", quote_id(shape));
                }
                Statement::Node { id, attrs } => {
                    let _ = write!(output, "{id} [");
                    for (index, (key, value)) in attrs.iter().enumerate() {
                        if index > 0 {
                            output.push_str(", ");
                        }
                        let _ = write!(output, "{key}={value}");
                    }
                    output.push_str("];");
                }
                Statement::Edge { from, to } => {
                    let _ = write!(output, "{from} -> {to};");
                }
            }
        }

        output.push_str("\n}");
    }
}

impl fmt::Display for DotDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut output = String::new();
        self.write_to_string(&mut output);
        f.write_str(&output)
    }
}

/// Double-quoted DOT string with `"` and `\` escaped.
#[must_use]
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(ch),
        }
    }
    quoted.push('"');
    quoted
}

/// Bare identifiers stay bare; anything else is quoted.
#[must_use]
pub fn quote_id(value: &str) -> String {
    let bare = !value.is_empty()
        && !value.starts_with(|ch: char| ch.is_ascii_digit())
        && value.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_');
    if bare { value.to_string() } else { quote(value) }
}
