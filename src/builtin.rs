use std::fmt;
use std::fmt::Formatter;

use crate::object::{Object, NULL};

pub type BuiltinFn = fn(Vec<Object>) -> Object;

/// A native function exposed to the language. The registry below is fixed at
/// compile time; identifier lookup falls back to it when the environment has
/// no binding.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltinFunction {
    name: &'static str,
    func: BuiltinFn,
}

impl BuiltinFunction {
    pub fn look_up(name: &str) -> Option<BuiltinFunction> {
        let (name, func): (&'static str, BuiltinFn) = match name {
            "len" => ("len", builtin_len),
            "first" => ("first", builtin_first),
            "last" => ("last", builtin_last),
            "rest" => ("rest", builtin_rest),
            "push" => ("push", builtin_push),
            "puts" => ("puts", builtin_puts),
            _ => return None,
        };
        Some(BuiltinFunction { name, func })
    }

    pub fn call(&self, args: Vec<Object>) -> Object {
        (self.func)(args)
    }
}

impl fmt::Display for BuiltinFunction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

fn wrong_arg_count(got: usize, want: usize) -> Object {
    Object::Error(format!(
        "wrong number of arguments. got={}, want={}",
        got, want
    ))
}

fn builtin_len(args: Vec<Object>) -> Object {
    if args.len() != 1 {
        return wrong_arg_count(args.len(), 1);
    }
    match &args[0] {
        Object::Str(value) => Object::Integer(value.len() as i64),
        Object::Array(elements) => Object::Integer(elements.len() as i64),
        other => Object::Error(format!(
            "argument to `len` not supported, got {}",
            other.type_name()
        )),
    }
}

fn builtin_first(args: Vec<Object>) -> Object {
    if args.len() != 1 {
        return wrong_arg_count(args.len(), 1);
    }
    match &args[0] {
        Object::Array(elements) => elements.first().cloned().unwrap_or(NULL),
        other => Object::Error(format!(
            "argument to `first` must be ARRAY, got {}",
            other.type_name()
        )),
    }
}

fn builtin_last(args: Vec<Object>) -> Object {
    if args.len() != 1 {
        return wrong_arg_count(args.len(), 1);
    }
    match &args[0] {
        Object::Array(elements) => elements.last().cloned().unwrap_or(NULL),
        other => Object::Error(format!(
            "argument to `last` must be ARRAY, got {}",
            other.type_name()
        )),
    }
}

fn builtin_rest(args: Vec<Object>) -> Object {
    if args.len() != 1 {
        return wrong_arg_count(args.len(), 1);
    }
    match &args[0] {
        Object::Array(elements) => {
            if elements.is_empty() {
                NULL
            } else {
                Object::Array(elements[1..].to_vec())
            }
        }
        other => Object::Error(format!(
            "argument to `rest` must be ARRAY, got {}",
            other.type_name()
        )),
    }
}

fn builtin_push(args: Vec<Object>) -> Object {
    if args.len() != 2 {
        return wrong_arg_count(args.len(), 2);
    }
    match &args[0] {
        Object::Array(elements) => {
            let mut elements = elements.clone();
            elements.push(args[1].clone());
            Object::Array(elements)
        }
        other => Object::Error(format!(
            "argument to `push` must be ARRAY, got {}",
            other.type_name()
        )),
    }
}

fn builtin_puts(args: Vec<Object>) -> Object {
    for arg in &args {
        println!("{}", arg);
    }
    NULL
}

#[cfg(test)]
mod test {
    use crate::builtin::BuiltinFunction;
    use crate::object::Object;

    fn call(name: &str, args: Vec<Object>) -> Object {
        BuiltinFunction::look_up(name)
            .unwrap_or_else(|| panic!("builtin {} not found", name))
            .call(args)
    }

    #[test]
    fn test_unknown_builtin() {
        assert!(BuiltinFunction::look_up("frobnicate").is_none());
    }

    #[test]
    fn test_display_is_the_name() {
        assert_eq!(
            BuiltinFunction::look_up("len").unwrap().to_string(),
            "len"
        );
        assert_eq!(
            BuiltinFunction::look_up("push").unwrap().to_string(),
            "push"
        );
    }

    #[test]
    fn test_len() {
        assert_eq!(
            call("len", vec![Object::Str("hello".to_string())]),
            Object::Integer(5)
        );
        assert_eq!(
            call("len", vec![Object::Str("".to_string())]),
            Object::Integer(0)
        );
        assert_eq!(
            call(
                "len",
                vec![Object::Array(vec![Object::Integer(1), Object::Integer(2)])]
            ),
            Object::Integer(2)
        );
        assert_eq!(
            call("len", vec![Object::Integer(1)]),
            Object::Error("argument to `len` not supported, got INTEGER".to_string())
        );
        assert_eq!(
            call("len", vec![]),
            Object::Error("wrong number of arguments. got=0, want=1".to_string())
        );
        assert_eq!(
            call(
                "len",
                vec![
                    Object::Str("a".to_string()),
                    Object::Str("b".to_string())
                ]
            ),
            Object::Error("wrong number of arguments. got=2, want=1".to_string())
        );
    }

    #[test]
    fn test_first_last_rest() {
        let arr = Object::Array(vec![
            Object::Integer(1),
            Object::Integer(2),
            Object::Integer(3),
        ]);

        assert_eq!(call("first", vec![arr.clone()]), Object::Integer(1));
        assert_eq!(call("last", vec![arr.clone()]), Object::Integer(3));
        assert_eq!(
            call("rest", vec![arr]),
            Object::Array(vec![Object::Integer(2), Object::Integer(3)])
        );

        assert_eq!(call("first", vec![Object::Array(vec![])]), Object::Null);
        assert_eq!(call("last", vec![Object::Array(vec![])]), Object::Null);
        assert_eq!(call("rest", vec![Object::Array(vec![])]), Object::Null);

        assert_eq!(
            call("first", vec![Object::Integer(1)]),
            Object::Error("argument to `first` must be ARRAY, got INTEGER".to_string())
        );
    }

    #[test]
    fn test_push_returns_a_new_array() {
        let arr = Object::Array(vec![Object::Integer(1)]);
        assert_eq!(
            call("push", vec![arr.clone(), Object::Integer(2)]),
            Object::Array(vec![Object::Integer(1), Object::Integer(2)])
        );
        // the original array is untouched
        assert_eq!(arr, Object::Array(vec![Object::Integer(1)]));

        assert_eq!(
            call("push", vec![arr]),
            Object::Error("wrong number of arguments. got=1, want=2".to_string())
        );
    }
}
