use std::cell::RefCell;
use std::fmt;
use std::fmt::Formatter;
use std::rc::Rc;

use crate::ast::Statement;
use crate::builtin::BuiltinFunction;
use crate::environment::Environment;

#[derive(Debug, Clone)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    Str(String),
    Null,
    ReturnValue(Box<Object>),
    Error(String),
    Function {
        parameters: Vec<String>,
        body: Statement,
        env: Rc<RefCell<Environment>>,
    },
    Builtin(BuiltinFunction),
    Array(Vec<Object>),
    Hash(Vec<(HashKey, HashPair)>),
}

pub const TRUE: Object = Object::Boolean(true);
pub const FALSE: Object = Object::Boolean(false);
pub const NULL: Object = Object::Null;

impl Object {
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Integer(_) => "INTEGER",
            Object::Boolean(_) => "BOOLEAN",
            Object::Str(_) => "STRING",
            Object::Null => "NULL",
            Object::ReturnValue(_) => "RETURN_VALUE",
            Object::Error(_) => "ERROR",
            Object::Function { .. } => "FUNCTION",
            Object::Builtin(_) => "BUILTIN",
            Object::Array(_) => "ARRAY",
            Object::Hash(_) => "HASH",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Object::Error(_))
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Object::Integer(a), Object::Integer(b)) => a == b,
            (Object::Boolean(a), Object::Boolean(b)) => a == b,
            (Object::Str(a), Object::Str(b)) => a == b,
            (Object::Null, Object::Null) => true,
            (Object::ReturnValue(a), Object::ReturnValue(b)) => a == b,
            (Object::Error(a), Object::Error(b)) => a == b,
            // functions compare by identity of their captured scope, never
            // structurally, since an environment can contain the function
            (
                Object::Function {
                    parameters: pa,
                    body: ba,
                    env: ea,
                },
                Object::Function {
                    parameters: pb,
                    body: bb,
                    env: eb,
                },
            ) => pa == pb && ba == bb && Rc::ptr_eq(ea, eb),
            (Object::Builtin(a), Object::Builtin(b)) => a == b,
            (Object::Array(a), Object::Array(b)) => a == b,
            (Object::Hash(a), Object::Hash(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Object::Integer(value) => write!(f, "{}", value),
            Object::Boolean(value) => write!(f, "{}", value),
            Object::Str(value) => write!(f, "{}", value),
            Object::Null => write!(f, "null"),
            Object::ReturnValue(value) => write!(f, "{}", value),
            Object::Error(message) => write!(f, "ERROR: {}", message),
            Object::Function {
                parameters, body, ..
            } => write!(f, "fn({}) {{ {} }}", parameters.join(", "), body),
            Object::Builtin(builtin) => write!(f, "builtin function {}", builtin),
            Object::Array(elements) => {
                let elems = elements
                    .iter()
                    .map(|elem| elem.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "[{}]", elems)
            }
            Object::Hash(pairs) => {
                let pairs = pairs
                    .iter()
                    .map(|(_, pair)| format!("{}: {}", pair.key, pair.value))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{{{}}}", pairs)
            }
        }
    }
}

/// Key type for hash literals. Only integers, booleans and strings can be
/// hashed; everything else is a runtime error at the construction site.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HashKey {
    Integer(i64),
    Boolean(bool),
    Str(String),
}

impl HashKey {
    pub fn from_object(obj: &Object) -> Option<HashKey> {
        match obj {
            Object::Integer(value) => Some(HashKey::Integer(*value)),
            Object::Boolean(value) => Some(HashKey::Boolean(*value)),
            Object::Str(value) => Some(HashKey::Str(value.clone())),
            _ => None,
        }
    }
}

/// The original key object and its value, kept so a hash can print its keys
/// exactly as written.
#[derive(Debug, Clone, PartialEq)]
pub struct HashPair {
    pub key: Object,
    pub value: Object,
}
