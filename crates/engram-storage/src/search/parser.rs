//! Recursive-descent parser for the search query language.
//!
//! Grammar:
//! ```text
//! query   := or
//! or      := and ( OR and )*
//! and     := unary+            -- adjacency is AND; the keyword is optional
//! unary   := NOT primary | primary
//! primary := word | "phrase"
//! ```
//! Operator keywords are uppercase, matching FTS5; lowercase `or` is an
//! ordinary search term.

use engram_core::errors::{EngramError, EngramResult};

use super::expr::QueryExpr;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Word(String),
    Phrase(String),
    And,
    Or,
    Not,
}

/// Parse a raw query string into an expression tree.
pub fn parse_query(input: &str) -> EngramResult<QueryExpr> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(invalid("query must not be empty"));
    }
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_or()?;
    if parser.pos != parser.tokens.len() {
        return Err(invalid("unexpected trailing input"));
    }
    Ok(expr)
}

fn invalid(reason: impl Into<String>) -> EngramError {
    EngramError::validation("query", reason)
}

fn tokenize(input: &str) -> EngramResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c == '"' {
            chars.next();
            let mut phrase = String::new();
            let mut closed = false;
            for ch in chars.by_ref() {
                if ch == '"' {
                    closed = true;
                    break;
                }
                phrase.push(ch);
            }
            if !closed {
                return Err(invalid("unbalanced quote"));
            }
            if phrase.trim().is_empty() {
                return Err(invalid("empty phrase"));
            }
            tokens.push(Token::Phrase(phrase));
        } else {
            let mut word = String::new();
            while let Some(&ch) = chars.peek() {
                if ch.is_whitespace() || ch == '"' {
                    break;
                }
                word.push(ch);
                chars.next();
            }
            // Operator keywords are uppercase only, as in FTS5 itself.
            tokens.push(match word.as_str() {
                "AND" => Token::And,
                "OR" => Token::Or,
                "NOT" => Token::Not,
                _ => Token::Word(word),
            });
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn parse_or(&mut self) -> EngramResult<QueryExpr> {
        let mut alternatives = vec![self.parse_and()?];
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            alternatives.push(self.parse_and()?);
        }
        if alternatives.len() == 1 {
            Ok(alternatives.pop().unwrap_or_else(|| unreachable!()))
        } else {
            Ok(QueryExpr::Or(alternatives))
        }
    }

    fn parse_and(&mut self) -> EngramResult<QueryExpr> {
        let mut positive = Vec::new();
        let mut negated = Vec::new();

        loop {
            match self.peek() {
                Some(Token::And) => {
                    // Explicit AND between members; reject a dangling one.
                    self.pos += 1;
                    if self.peek().is_none() || self.peek() == Some(&Token::Or) {
                        return Err(invalid("AND requires a right-hand side"));
                    }
                }
                Some(Token::Not) => {
                    self.pos += 1;
                    negated.push(self.parse_primary()?);
                }
                Some(Token::Word(_)) | Some(Token::Phrase(_)) => {
                    positive.push(self.parse_primary()?);
                }
                Some(Token::Or) | None => break,
            }
        }

        if positive.is_empty() {
            if negated.is_empty() {
                return Err(invalid("expected a search term"));
            }
            return Err(invalid(
                "negation requires at least one non-negated term to subtract from",
            ));
        }

        if negated.is_empty() && positive.len() == 1 {
            return Ok(positive.pop().unwrap_or_else(|| unreachable!()));
        }
        Ok(QueryExpr::And { positive, negated })
    }

    fn parse_primary(&mut self) -> EngramResult<QueryExpr> {
        match self.tokens.get(self.pos).cloned() {
            Some(Token::Word(word)) => {
                self.pos += 1;
                Ok(QueryExpr::Term(word))
            }
            Some(Token::Phrase(phrase)) => {
                self.pos += 1;
                Ok(QueryExpr::Phrase(phrase))
            }
            Some(Token::Not) => Err(invalid("NOT must be followed by a term or phrase")),
            Some(Token::And) | Some(Token::Or) => {
                Err(invalid("operator where a term or phrase was expected"))
            }
            None => Err(invalid("query ends where a term or phrase was expected")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn match_expr(input: &str) -> String {
        parse_query(input).unwrap().to_match_expr()
    }

    #[test]
    fn single_term() {
        assert_eq!(match_expr("deploy"), "\"deploy\"");
    }

    #[test]
    fn adjacency_is_implicit_and() {
        assert_eq!(match_expr("deploy production"), "\"deploy\" AND \"production\"");
    }

    #[test]
    fn explicit_and_is_equivalent() {
        assert_eq!(
            match_expr("deploy AND production"),
            "\"deploy\" AND \"production\""
        );
    }

    #[test]
    fn negation_renders_after_positives() {
        assert_eq!(
            match_expr("deploy AND NOT staging"),
            "\"deploy\" NOT \"staging\""
        );
        assert_eq!(match_expr("deploy NOT staging"), "\"deploy\" NOT \"staging\"");
    }

    #[test]
    fn or_binds_looser_than_and() {
        assert_eq!(
            match_expr("deploy prod OR release"),
            "(\"deploy\" AND \"prod\") OR \"release\""
        );
    }

    #[test]
    fn quoted_phrase_survives_whole() {
        assert_eq!(match_expr("\"cargo test --release\""), "\"cargo test --release\"");
    }

    #[test]
    fn lowercase_keywords_are_terms() {
        assert_eq!(match_expr("cat or dog"), "\"cat\" AND \"or\" AND \"dog\"");
    }

    #[test]
    fn embedded_quote_is_escaped() {
        assert_eq!(match_expr("it\"s"), "\"it\"\"s\"");
    }

    #[test]
    fn rejects_malformed_queries() {
        for bad in [
            "",
            "   ",
            "\"unbalanced",
            "\"\"",
            "NOT staging",
            "OR deploy",
            "deploy OR",
            "deploy AND",
            "deploy NOT",
            "NOT NOT x",
        ] {
            assert!(
                matches!(
                    parse_query(bad),
                    Err(engram_core::EngramError::Validation { field: "query", .. })
                ),
                "expected validation error for {bad:?}"
            );
        }
    }
}
