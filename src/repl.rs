use std::io::{BufRead, BufReader, Read, Write};

use crate::evaluator::Evaluator;
use crate::lexer::Lexer;
use crate::parser::Parser;

const PROMPT: &str = ">> ";

/// Reads lines until EOF, evaluating each against one persistent root
/// environment so that bindings survive across lines.
pub fn start<R: Read, W: Write>(reader: R, mut writer: W) -> std::io::Result<()> {
    let mut evaluator = Evaluator::new();
    let mut reader = BufReader::new(reader);

    loop {
        write!(writer, "{}", PROMPT)?;
        writer.flush()?;

        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            writeln!(writer)?;
            return Ok(());
        }

        let mut parser = Parser::new(Lexer::new(&line));
        let program = parser.parse_program();
        if !parser.errors().is_empty() {
            print_parser_errors(&mut writer, parser.errors())?;
            continue;
        }

        let evaluated = evaluator.eval(&program);
        writeln!(writer, "{}", evaluated)?;
    }
}

fn print_parser_errors<W: Write>(writer: &mut W, errors: &[String]) -> std::io::Result<()> {
    writeln!(writer, "parser errors:")?;
    for message in errors {
        writeln!(writer, "    {}", message)?;
    }
    writer.flush()
}

#[cfg(test)]
mod test {
    use crate::repl;

    fn run(input: &str) -> String {
        let mut output = Vec::new();
        repl::start(input.as_bytes(), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_evaluates_each_line() {
        let output = run("1 + 2\n");
        assert!(output.contains("3"), "output was {:?}", output);
    }

    #[test]
    fn test_bindings_survive_across_lines() {
        let output = run("let a = 40;\na + 2\n");
        assert!(output.contains("42"), "output was {:?}", output);
    }

    #[test]
    fn test_parse_errors_are_printed() {
        let output = run("let x 5;\n");
        assert!(
            output.contains("expected next token to be =, got INT instead"),
            "output was {:?}",
            output
        );
    }

    #[test]
    fn test_runtime_errors_are_printed() {
        let output = run("5 + true;\n");
        assert!(
            output.contains("ERROR: type mismatch: INTEGER + BOOLEAN"),
            "output was {:?}",
            output
        );
    }
}
