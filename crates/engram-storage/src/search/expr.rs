/// Parsed search query.
///
/// Negation only exists inside a conjunction: FTS5's NOT is a binary
/// set-difference operator, so `NOT x` with nothing positive to subtract
/// from is unsatisfiable and the parser rejects it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryExpr {
    /// A single bare word.
    Term(String),
    /// A quoted phrase, matched as adjacent tokens.
    Phrase(String),
    /// Conjunction with optional negated members.
    And {
        positive: Vec<QueryExpr>,
        negated: Vec<QueryExpr>,
    },
    /// Disjunction of two or more alternatives.
    Or(Vec<QueryExpr>),
}

impl QueryExpr {
    /// Render as an FTS5 MATCH expression.
    pub fn to_match_expr(&self) -> String {
        match self {
            Self::Term(word) => quote(word),
            Self::Phrase(phrase) => quote(phrase),
            Self::And { positive, negated } => {
                let mut out = positive
                    .iter()
                    .map(|e| e.render_child())
                    .collect::<Vec<_>>()
                    .join(" AND ");
                for n in negated {
                    out.push_str(" NOT ");
                    out.push_str(&n.render_child());
                }
                out
            }
            Self::Or(alternatives) => alternatives
                .iter()
                .map(|e| e.render_child())
                .collect::<Vec<_>>()
                .join(" OR "),
        }
    }

    /// Composite children are parenthesized to pin FTS5 precedence.
    fn render_child(&self) -> String {
        match self {
            Self::Term(_) | Self::Phrase(_) => self.to_match_expr(),
            _ => format!("({})", self.to_match_expr()),
        }
    }
}

/// Double-quote a term or phrase for FTS5, escaping embedded quotes.
fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}
