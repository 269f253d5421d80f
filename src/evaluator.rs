use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{Expression, Program, Statement};
use crate::builtin::BuiltinFunction;
use crate::environment::Environment;
use crate::object::{HashKey, HashPair, Object, FALSE, NULL, TRUE};

pub struct Evaluator {
    env: Rc<RefCell<Environment>>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    pub fn new() -> Self {
        Evaluator {
            env: Environment::new(),
        }
    }

    pub fn with_env(env: Rc<RefCell<Environment>>) -> Self {
        Evaluator { env }
    }

    /// Evaluates a whole program. `ReturnValue` is unwrapped here, and only
    /// here, so it never escapes to the caller.
    pub fn eval(&mut self, program: &Program) -> Object {
        let mut result = NULL;

        for stmt in &program.statements {
            result = self.eval_statement(stmt);
            match result {
                Object::ReturnValue(value) => return *value,
                Object::Error(_) => return result,
                _ => {}
            }
        }
        result
    }

    fn eval_statement(&mut self, stmt: &Statement) -> Object {
        match stmt {
            Statement::Expression(expr) => self.eval_expression(expr),
            Statement::Block(stmts) => self.eval_block(stmts),
            Statement::Return(expr) => {
                let value = self.eval_expression(expr);
                if value.is_error() {
                    return value;
                }
                Object::ReturnValue(Box::new(value))
            }
            Statement::Let { name, value } => {
                let value = self.eval_expression(value);
                if value.is_error() {
                    return value;
                }
                // binding a function here makes its defining scope
                // self-referential and thus unreclaimable; see DESIGN.md
                self.env.borrow_mut().set(name.clone(), value.clone());
                value
            }
        }
    }

    // unlike eval, a block passes ReturnValue through untouched so that the
    // enclosing function call (or program) unwraps it exactly once
    fn eval_block(&mut self, stmts: &[Statement]) -> Object {
        let mut result = NULL;

        for stmt in stmts {
            result = self.eval_statement(stmt);
            if matches!(result, Object::ReturnValue(_) | Object::Error(_)) {
                return result;
            }
        }
        result
    }

    fn eval_expression(&mut self, expr: &Expression) -> Object {
        match expr {
            Expression::Integer(value) => Object::Integer(*value),
            Expression::Str(value) => Object::Str(value.clone()),
            Expression::Boolean(value) => native_bool_to_object(*value),
            Expression::Identifier(name) => self.eval_identifier(name),
            Expression::Prefix { operator, right } => {
                let right = self.eval_expression(right);
                if right.is_error() {
                    return right;
                }
                eval_prefix_expression(operator, right)
            }
            Expression::Infix {
                operator,
                left,
                right,
            } => {
                let left = self.eval_expression(left);
                if left.is_error() {
                    return left;
                }
                let right = self.eval_expression(right);
                if right.is_error() {
                    return right;
                }
                eval_infix_expression(operator, left, right)
            }
            Expression::If {
                condition,
                consequence,
                alternative,
            } => {
                let condition = self.eval_expression(condition);
                if condition.is_error() {
                    return condition;
                }
                if is_truthy(&condition) {
                    self.eval_statement(consequence)
                } else {
                    match alternative {
                        Some(alt) => self.eval_statement(alt),
                        None => NULL,
                    }
                }
            }
            Expression::Function { parameters, body } => Object::Function {
                parameters: parameters.clone(),
                body: (**body).clone(),
                env: Rc::clone(&self.env),
            },
            Expression::Call {
                function,
                arguments,
            } => {
                let function = self.eval_expression(function);
                if function.is_error() {
                    return function;
                }
                let args = match self.eval_expressions(arguments) {
                    Ok(args) => args,
                    Err(err) => return err,
                };
                apply_function(function, args)
            }
            Expression::Array(elements) => match self.eval_expressions(elements) {
                Ok(elements) => Object::Array(elements),
                Err(err) => err,
            },
            Expression::Hash(pairs) => self.eval_hash_literal(pairs),
            Expression::Index { left, index } => {
                let left = self.eval_expression(left);
                if left.is_error() {
                    return left;
                }
                let index = self.eval_expression(index);
                if index.is_error() {
                    return index;
                }
                eval_index_expression(left, index)
            }
        }
    }

    fn eval_identifier(&self, name: &str) -> Object {
        if let Some(obj) = self.env.borrow().get(name) {
            return obj;
        }
        match BuiltinFunction::look_up(name) {
            Some(builtin) => Object::Builtin(builtin),
            None => new_error(format!("identifier not found: {}", name)),
        }
    }

    // left to right, stopping at the first error
    fn eval_expressions(&mut self, exprs: &[Expression]) -> Result<Vec<Object>, Object> {
        let mut result = Vec::with_capacity(exprs.len());
        for expr in exprs {
            let evaluated = self.eval_expression(expr);
            if evaluated.is_error() {
                return Err(evaluated);
            }
            result.push(evaluated);
        }
        Ok(result)
    }

    fn eval_hash_literal(&mut self, pairs: &[(Expression, Expression)]) -> Object {
        let mut hash: Vec<(HashKey, HashPair)> = Vec::with_capacity(pairs.len());

        for (key_expr, value_expr) in pairs {
            let key = self.eval_expression(key_expr);
            if key.is_error() {
                return key;
            }
            let hash_key = match HashKey::from_object(&key) {
                Some(hash_key) => hash_key,
                None => {
                    return new_error(format!("unusable as hash key: {}", key.type_name()));
                }
            };

            let value = self.eval_expression(value_expr);
            if value.is_error() {
                return value;
            }

            let pair = HashPair { key, value };
            match hash.iter_mut().find(|(k, _)| *k == hash_key) {
                // duplicate keys overwrite in place, keeping first-insertion order
                Some((_, existing)) => *existing = pair,
                None => hash.push((hash_key, pair)),
            }
        }
        Object::Hash(hash)
    }
}

pub fn new_error(message: String) -> Object {
    Object::Error(message)
}

fn native_bool_to_object(value: bool) -> Object {
    if value {
        TRUE
    } else {
        FALSE
    }
}

fn is_truthy(obj: &Object) -> bool {
    !matches!(obj, Object::Null | Object::Boolean(false))
}

fn eval_prefix_expression(operator: &str, right: Object) -> Object {
    match operator {
        "!" => native_bool_to_object(!is_truthy(&right)),
        "-" => match right {
            Object::Integer(value) => Object::Integer(-value),
            other => new_error(format!("unknown operator: -{}", other.type_name())),
        },
        _ => new_error(format!(
            "unknown operator: {}{}",
            operator,
            right.type_name()
        )),
    }
}

fn eval_infix_expression(operator: &str, left: Object, right: Object) -> Object {
    match (&left, &right) {
        (Object::Integer(l), Object::Integer(r)) => {
            eval_integer_infix_expression(operator, *l, *r)
        }
        (Object::Str(l), Object::Str(r)) => eval_string_infix_expression(operator, l, r),
        (Object::Boolean(l), Object::Boolean(r)) => match operator {
            "==" => native_bool_to_object(l == r),
            "!=" => native_bool_to_object(l != r),
            _ => new_error(format!("unknown operator: BOOLEAN {} BOOLEAN", operator)),
        },
        _ if left.type_name() != right.type_name() => new_error(format!(
            "type mismatch: {} {} {}",
            left.type_name(),
            operator,
            right.type_name()
        )),
        _ => new_error(format!(
            "unknown operator: {} {} {}",
            left.type_name(),
            operator,
            right.type_name()
        )),
    }
}

fn eval_integer_infix_expression(operator: &str, left: i64, right: i64) -> Object {
    match operator {
        "+" => Object::Integer(left + right),
        "-" => Object::Integer(left - right),
        "*" => Object::Integer(left * right),
        "/" => {
            if right == 0 {
                new_error("division by zero".to_string())
            } else {
                Object::Integer(left / right)
            }
        }
        "<" => native_bool_to_object(left < right),
        ">" => native_bool_to_object(left > right),
        "==" => native_bool_to_object(left == right),
        "!=" => native_bool_to_object(left != right),
        _ => new_error(format!("unknown operator: INTEGER {} INTEGER", operator)),
    }
}

fn eval_string_infix_expression(operator: &str, left: &str, right: &str) -> Object {
    match operator {
        "+" => Object::Str(format!("{}{}", left, right)),
        _ => new_error(format!("unknown operator: STRING {} STRING", operator)),
    }
}

fn apply_function(function: Object, args: Vec<Object>) -> Object {
    match function {
        Object::Function {
            parameters,
            body,
            env,
        } => {
            let scope = Environment::new_enclosed(env);
            // positional zip: extra arguments are dropped, missing
            // parameters bind to null
            for (i, param) in parameters.iter().enumerate() {
                let value = args.get(i).cloned().unwrap_or(NULL);
                scope.borrow_mut().set(param.clone(), value);
            }

            let result = Evaluator::with_env(scope).eval_statement(&body);
            unwrap_return_value(result)
        }
        Object::Builtin(builtin) => builtin.call(args),
        other => new_error(format!("not a function: {}", other.type_name())),
    }
}

fn unwrap_return_value(obj: Object) -> Object {
    match obj {
        Object::ReturnValue(value) => *value,
        other => other,
    }
}

fn eval_index_expression(left: Object, index: Object) -> Object {
    match (&left, &index) {
        (Object::Array(elements), Object::Integer(i)) => {
            if *i < 0 || *i >= elements.len() as i64 {
                NULL
            } else {
                elements[*i as usize].clone()
            }
        }
        (Object::Hash(pairs), _) => match HashKey::from_object(&index) {
            Some(key) => pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, pair)| pair.value.clone())
                .unwrap_or(NULL),
            None => new_error(format!("unusable as hash key: {}", index.type_name())),
        },
        _ => new_error(format!(
            "index operator not supported: {}",
            left.type_name()
        )),
    }
}
