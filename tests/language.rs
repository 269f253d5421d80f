//! End-to-end scenarios driven through the whole pipeline: source text in,
//! printed value out.

use autumn::evaluator::Evaluator;
use autumn::lexer::Lexer;
use autumn::object::Object;
use autumn::parser::Parser;
use autumn::{interpret, Error};

/// Runs `input` and returns the textual form of the result, the way the REPL
/// would print it (runtime errors render as `ERROR: ...`).
fn run(input: &str) -> String {
    let mut parser = Parser::new(Lexer::new(input));
    let program = parser.parse_program();
    assert_eq!(
        parser.errors(),
        &[] as &[String],
        "parser errors for {:?}",
        input
    );
    Evaluator::new().eval(&program).to_string()
}

#[test]
fn printed_values_match_expectations() {
    let tests = vec![
        (
            "let a = 5; let b = a > 3; let c = a * 99; if (b) { 10 } else { 1 };",
            "10",
        ),
        (
            "let add = fn(a, b) { a + b; }; let sub = fn(a, b) { a - b; }; \
             let apply = fn(a, b, f) { f(a, b); }; apply(2, 2, add);",
            "4",
        ),
        (
            "let newAdder = fn(x) { fn(y) { x + y } }; let addTwo = newAdder(2); addTwo(3);",
            "5",
        ),
        ("let arr = [1, 2, 3]; len(arr) + arr[0] + arr[2];", "7"),
        ("let arr = [1, 2, 3]; len(arr) + arr[0] + arr[1];", "6"),
        (r#"let h = {"one": 1, "two": 2}; h["one"] + h["two"];"#, "3"),
        ("5 + true;", "ERROR: type mismatch: INTEGER + BOOLEAN"),
        ("foobar;", "ERROR: identifier not found: foobar"),
        (r#""Hello" + " " + "World""#, "Hello World"),
        ("len(1)", "ERROR: argument to `len` not supported, got INTEGER"),
        ("if (10 > 1) { if (10 > 1) { return 10; } return 1; }", "10"),
        ("5 / 0", "ERROR: division by zero"),
        ("[1, 2, 3][5]", "null"),
        (r#"{"a": 1}["b"]"#, "null"),
        ("[1, 2 * 3, 4 + 5]", "[1, 6, 9]"),
        (r#"{"one": 1, "two": 2}"#, "{one: 1, two: 2}"),
        ("fn(x, y) { x + y; }", "fn(x, y) { (x + y) }"),
    ];

    for (input, expected) in tests {
        assert_eq!(run(input), expected, "input {:?}", input);
    }
}

#[test]
fn serialization_round_trips() {
    let inputs = vec![
        "let a = 5;",
        "return (10 * 2);",
        "((-a) * b)",
        "(a + (b / c))",
        "if (x < y) {x} else {y}",
        "fn(x, y) { (x + y) }",
        "[1, 2, add(3, 4)]",
        "{one:1, two:(2 * 2)}",
        "(myArray[(i + 1)])",
        r#"let add = fn(a, b) { (a + b) };add(1, 2)"#,
    ];

    for input in inputs {
        let mut parser = Parser::new(Lexer::new(input));
        let program = parser.parse_program();
        assert_eq!(parser.errors(), &[] as &[String], "input {:?}", input);
        let serialized = program.to_string();

        let mut reparser = Parser::new(Lexer::new(&serialized));
        let reparsed = reparser.parse_program();
        assert_eq!(
            reparser.errors(),
            &[] as &[String],
            "serialized form {:?} does not re-parse",
            serialized
        );
        assert_eq!(
            reparsed.to_string(),
            serialized,
            "canonical form is not a fixed point for {:?}",
            input
        );
    }
}

#[test]
fn evaluation_is_deterministic() {
    let input = r#"
let fib = fn(n) {
    if (n < 2) { n } else { fib(n - 1) + fib(n - 2) }
};
let h = {"base": fib(10), "next": fib(11)};
h["base"] + h["next"]
"#;
    assert_eq!(run(input), run(input));
    assert_eq!(run(input), "144");
}

#[test]
fn errors_short_circuit_unchanged() {
    // whatever surrounds the failing sub-expression, the message is the same
    let expected = "ERROR: identifier not found: missing";
    let tests = vec![
        "missing",
        "-missing",
        "1 + missing",
        "missing + 1",
        "[1, missing, 3]",
        r#"{"k": missing}"#,
        "{missing: 1}",
        "len(missing)",
        "fn(x) { x }(missing)",
        "if (missing) { 1 }",
        "[1, 2][missing]",
        "let x = missing; x",
        "return missing;",
    ];

    for input in tests {
        assert_eq!(run(input), expected, "input {:?}", input);
    }
}

#[test]
fn double_bang_matches_truthiness() {
    let tests = vec![
        ("!!true", "true"),
        ("!!false", "false"),
        ("!!0", "true"),
        ("!!1", "true"),
        (r#"!!"""#, "true"),
        (r#"!!"x""#, "true"),
        ("!![]", "true"),
        ("!!{}", "true"),
        ("!!fn(x) { x }", "true"),
        ("!!if (false) { 1 }", "false"), // the if yields null
    ];

    for (input, expected) in tests {
        assert_eq!(run(input), expected, "input {:?}", input);
    }
}

#[test]
fn closures_keep_their_environment_alive() {
    let input = r#"
let makeCounter = fn() {
    let start = 100;
    fn(n) { start + n }
};
let counter = makeCounter();
counter(1) + counter(2)
"#;
    assert_eq!(run(input), "203");
}

#[test]
fn closures_see_bindings_added_after_definition() {
    let input = "let f = fn() { late }; let late = 7; f()";
    assert_eq!(run(input), "7");
}

#[test]
fn interpret_reports_both_error_channels() {
    assert_eq!(interpret("2 + 3"), Ok(Object::Integer(5)));

    match interpret("let = 5;") {
        Err(Error::Parse(_)) => {}
        other => panic!("expected a parse error, got {:?}", other),
    }

    assert_eq!(
        interpret("5 + true"),
        Err(Error::Eval("type mismatch: INTEGER + BOOLEAN".to_string()))
    );
}
