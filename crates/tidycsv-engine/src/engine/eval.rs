//! Arithmetic evaluation for formula cells.
//!
//! Formulas are preprocessed into plain arithmetic and then evaluated by a
//! small recursive-descent parser. Only numeric literals, parentheses and
//! `+ - * / ^` are understood: there are no identifiers, no function calls
//! and nothing else that could reach outside the expression.
//!
//! GRAMMAR:
//!   expression     --> additive
//!   additive       --> multiplicative ( ("+" | "-") multiplicative )*
//!   multiplicative --> unary ( ("*" | "/") unary )*
//!   unary          --> ("-" | "+") unary | power
//!   power          --> primary ( "^" unary )?
//!   primary        --> NUMBER | "(" expression ")"

use std::iter::Peekable;
use std::str::CharIndices;

use super::preprocess::preprocess_formula;
use super::values::CellValues;
use crate::error::{FormulaError, FormulaResult};

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Asterisk,
    Slash,
    Caret,
    LParen,
    RParen,
    Eof,
}

struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Lexer {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    /// Returns the next token and the byte offset where it starts.
    fn next_token(&mut self) -> FormulaResult<(Token, usize)> {
        while let Some((_, c)) = self.chars.peek() {
            if c.is_whitespace() {
                self.chars.next();
            } else {
                break;
            }
        }

        let Some((pos, c)) = self.chars.next() else {
            return Ok((Token::Eof, self.input.len()));
        };

        let token = match c {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Asterisk,
            '/' => Token::Slash,
            '^' => Token::Caret,
            '(' => Token::LParen,
            ')' => Token::RParen,
            c if c.is_ascii_digit() || c == '.' => self.read_number(pos)?,
            other => {
                return Err(FormulaError::Syntax {
                    position: pos,
                    message: format!("unexpected character '{}'", other),
                });
            }
        };
        Ok((token, pos))
    }

    fn read_number(&mut self, start: usize) -> FormulaResult<Token> {
        let mut end = start + 1;
        let mut seen_exp = false;
        while let Some(&(pos, c)) = self.chars.peek() {
            let accept = if c.is_ascii_digit() || c == '.' {
                true
            } else if (c == 'e' || c == 'E') && !seen_exp {
                seen_exp = true;
                true
            } else {
                (c == '+' || c == '-')
                    && seen_exp
                    && matches!(self.input[..pos].chars().last(), Some('e' | 'E'))
            };
            if !accept {
                break;
            }
            self.chars.next();
            end = pos + c.len_utf8();
        }

        let literal = &self.input[start..end];
        literal
            .parse::<f64>()
            .map(Token::Number)
            .map_err(|_| FormulaError::Syntax {
                position: start,
                message: format!("invalid number '{}'", literal),
            })
    }
}

/// Deepest nesting of parentheses, signs and exponents a formula may use.
pub const MAX_NESTING_DEPTH: usize = 256;

struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    position: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> FormulaResult<Self> {
        let mut lexer = Lexer::new(input);
        let (current, position) = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current,
            position,
            depth: 0,
        })
    }

    fn advance(&mut self) -> FormulaResult<()> {
        let (token, position) = self.lexer.next_token()?;
        self.current = token;
        self.position = position;
        Ok(())
    }

    fn syntax_error<T>(&self, message: impl Into<String>) -> FormulaResult<T> {
        Err(FormulaError::Syntax {
            position: self.position,
            message: message.into(),
        })
    }

    fn parse(&mut self) -> FormulaResult<f64> {
        let value = self.additive()?;
        if self.current != Token::Eof {
            return self.syntax_error(format!("unexpected token {:?}", self.current));
        }
        Ok(value)
    }

    fn additive(&mut self) -> FormulaResult<f64> {
        let mut left = self.multiplicative()?;
        loop {
            match self.current {
                Token::Plus => {
                    self.advance()?;
                    left += self.multiplicative()?;
                }
                Token::Minus => {
                    self.advance()?;
                    left -= self.multiplicative()?;
                }
                _ => return Ok(left),
            }
        }
    }

    fn multiplicative(&mut self) -> FormulaResult<f64> {
        let mut left = self.unary()?;
        loop {
            match self.current {
                Token::Asterisk => {
                    self.advance()?;
                    left *= self.unary()?;
                }
                Token::Slash => {
                    self.advance()?;
                    let right = self.unary()?;
                    if right == 0.0 {
                        return Err(FormulaError::DivisionByZero);
                    }
                    left /= right;
                }
                _ => return Ok(left),
            }
        }
    }

    // Every nested operand passes through here: `(`, sign chains and `^`.
    fn unary(&mut self) -> FormulaResult<f64> {
        if self.depth >= MAX_NESTING_DEPTH {
            return self.syntax_error("expression nested too deeply");
        }
        self.depth += 1;
        let value = self.signed();
        self.depth -= 1;
        value
    }

    fn signed(&mut self) -> FormulaResult<f64> {
        match self.current {
            Token::Minus => {
                self.advance()?;
                Ok(-self.unary()?)
            }
            Token::Plus => {
                self.advance()?;
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> FormulaResult<f64> {
        let base = self.primary()?;
        if self.current == Token::Caret {
            self.advance()?;
            let exponent = self.unary()?;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    fn primary(&mut self) -> FormulaResult<f64> {
        match self.current {
            Token::Number(n) => {
                self.advance()?;
                Ok(n)
            }
            Token::LParen => {
                self.advance()?;
                let value = self.additive()?;
                if self.current != Token::RParen {
                    return self.syntax_error("expected ')'");
                }
                self.advance()?;
                Ok(value)
            }
            Token::Eof => self.syntax_error("unexpected end of expression"),
            _ => self.syntax_error(format!("unexpected token {:?}", self.current)),
        }
    }
}

/// Evaluate a plain arithmetic expression (no references).
pub fn eval_arithmetic(expr: &str) -> FormulaResult<f64> {
    let value = Parser::new(expr)?.parse()?;
    if !value.is_finite() {
        return Err(FormulaError::NonFinite);
    }
    Ok(value)
}

/// Evaluate a formula cell (`=A1+SUM(B1:B3)`) against a value snapshot.
pub fn evaluate_formula(formula: &str, values: &CellValues) -> FormulaResult<f64> {
    let body = formula
        .trim()
        .strip_prefix('=')
        .ok_or(FormulaError::MissingEquals)?;
    if body.trim().is_empty() {
        return Err(FormulaError::EmptyFormula);
    }
    eval_arithmetic(&preprocess_formula(body, values))
}

/// Cheap structural checks for a formula typed by a user.
///
/// Requires a leading `=`, balanced parentheses, a non-empty body and no
/// literal division by zero (`/ 0` not followed by `.` or a digit).
pub fn validate_formula(input: &str) -> FormulaResult<()> {
    let Some(body) = input.strip_prefix('=') else {
        return Err(FormulaError::MissingEquals);
    };

    let mut depth = 0usize;
    for c in input.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or(FormulaError::UnbalancedParentheses)?;
            }
            _ => {}
        }
    }
    if depth > 0 {
        return Err(FormulaError::UnbalancedParentheses);
    }

    let body = body.trim();
    if body.is_empty() {
        return Err(FormulaError::EmptyFormula);
    }

    if divides_by_literal_zero(body) {
        return Err(FormulaError::DivisionByZero);
    }
    Ok(())
}

fn divides_by_literal_zero(body: &str) -> bool {
    let bytes = body.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b != b'/' {
            continue;
        }
        let mut j = i + 1;
        while j < bytes.len() && bytes[j].is_ascii_whitespace() {
            j += 1;
        }
        if j < bytes.len() && bytes[j] == b'0' {
            let next = bytes.get(j + 1);
            if !matches!(next, Some(n) if *n == b'.' || n.is_ascii_digit()) {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::CellRef;

    #[test]
    fn test_eval_arithmetic_precedence() {
        assert_eq!(eval_arithmetic("1 + 2 * 3").unwrap(), 7.0);
        assert_eq!(eval_arithmetic("(1 + 2) * 3").unwrap(), 9.0);
        assert_eq!(eval_arithmetic("10 - 4 - 3").unwrap(), 3.0);
        assert_eq!(eval_arithmetic("8 / 4 / 2").unwrap(), 1.0);
    }

    #[test]
    fn test_eval_arithmetic_power_is_right_associative() {
        assert_eq!(eval_arithmetic("2 ^ 3 ^ 2").unwrap(), 512.0);
        assert_eq!(eval_arithmetic("-2 ^ 2").unwrap(), -4.0);
        assert_eq!(eval_arithmetic("2 ^ -1").unwrap(), 0.5);
    }

    #[test]
    fn test_eval_arithmetic_unary_and_exponent_literals() {
        assert_eq!(eval_arithmetic("10--5").unwrap(), 15.0);
        assert_eq!(eval_arithmetic("+3").unwrap(), 3.0);
        assert_eq!(eval_arithmetic("1e+2 + .5").unwrap(), 100.5);
    }

    #[test]
    fn test_eval_arithmetic_rejects_non_arithmetic() {
        assert!(matches!(
            eval_arithmetic("alert(1)"),
            Err(FormulaError::Syntax { .. })
        ));
        assert!(eval_arithmetic("1 +").is_err());
        assert!(eval_arithmetic("(1 + 2").is_err());
        assert!(eval_arithmetic("1 2").is_err());
        assert!(eval_arithmetic("").is_err());
        assert!(eval_arithmetic("1..2").is_err());
    }

    #[test]
    fn test_eval_arithmetic_division_by_zero() {
        assert_eq!(eval_arithmetic("1/0"), Err(FormulaError::DivisionByZero));
        assert_eq!(eval_arithmetic("10^400"), Err(FormulaError::NonFinite));
    }

    #[test]
    fn test_eval_arithmetic_nesting_limit() {
        let nested = |n: usize| format!("{}1{}", "(".repeat(n), ")".repeat(n));
        assert_eq!(eval_arithmetic(&nested(100)).unwrap(), 1.0);

        for expr in [
            nested(200_000),
            format!("{}1", "-".repeat(100_000)),
            format!("2{}", "^1".repeat(100_000)),
        ] {
            assert!(matches!(
                eval_arithmetic(&expr),
                Err(FormulaError::Syntax { ref message, .. }) if message == "expression nested too deeply"
            ));
        }
    }

    #[test]
    fn test_evaluate_formula_with_references() {
        let mut values = CellValues::default();
        values.insert(CellRef::new(0, 0), 10.0);
        values.insert(CellRef::new(1, 0), 5.0);
        values.insert(CellRef::new(0, 1), 20.0);

        assert_eq!(evaluate_formula("=A1+B1", &values).unwrap(), 15.0);
        assert_eq!(evaluate_formula("=SUM(A1:A2)", &values).unwrap(), 30.0);
        assert_eq!(evaluate_formula("=AVG(A1:B2) * 2", &values).unwrap(), 23.333333333333332);
        assert_eq!(evaluate_formula("=C7 + 1", &values).unwrap(), 1.0);
        assert_eq!(
            evaluate_formula("A1+B1", &values),
            Err(FormulaError::MissingEquals)
        );
        assert_eq!(evaluate_formula("=", &values), Err(FormulaError::EmptyFormula));
    }

    #[test]
    fn test_validate_formula() {
        assert!(validate_formula("=SUM(A1:A5)").is_ok());
        assert!(validate_formula("=A1/0.5").is_ok());
        assert!(validate_formula("=A1/10").is_ok());
        assert_eq!(validate_formula("A1"), Err(FormulaError::MissingEquals));
        assert_eq!(
            validate_formula("=SUM(A1:A5"),
            Err(FormulaError::UnbalancedParentheses)
        );
        assert_eq!(
            validate_formula("=A1)("),
            Err(FormulaError::UnbalancedParentheses)
        );
        assert_eq!(validate_formula("=  "), Err(FormulaError::EmptyFormula));
        assert_eq!(validate_formula("=A1 / 0"), Err(FormulaError::DivisionByZero));
    }
}
