//! Tree-walking interpreter for the Autumn expression language: a lexer, a
//! Pratt parser and an environment-based evaluator, glued together by a
//! line-oriented REPL.

use std::fmt;
use std::fmt::Formatter;

use tracing::debug;

pub mod ast;
pub mod builtin;
pub mod environment;
pub mod evaluator;
pub mod lexer;
pub mod object;
pub mod parser;
pub mod repl;
pub mod token;

use crate::evaluator::Evaluator;
use crate::lexer::Lexer;
use crate::object::Object;
use crate::parser::Parser;

/// Everything that can go wrong when a host runs a source string in one shot.
/// Inside the language, runtime errors stay ordinary `Object::Error` values;
/// this type is only the embedding-level wrapper.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    #[error("{0}")]
    Parse(ParseErrors),
    #[error("{0}")]
    Eval(String),
}

#[derive(Debug, PartialEq)]
pub struct ParseErrors(pub Vec<String>);

impl fmt::Display for ParseErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "parser errors:")?;
        for message in &self.0 {
            writeln!(f, "    {}", message)?;
        }
        Ok(())
    }
}

/// Parses and evaluates `source` against a fresh root environment, returning
/// the final value.
pub fn interpret(source: &str) -> Result<Object, Error> {
    let mut parser = Parser::new(Lexer::new(source));
    let program = parser.parse_program();
    if !parser.errors().is_empty() {
        return Err(Error::Parse(ParseErrors(parser.errors().to_vec())));
    }
    debug!(statements = program.statements.len(), "program parsed");

    match Evaluator::new().eval(&program) {
        Object::Error(message) => Err(Error::Eval(message)),
        value => Ok(value),
    }
}
