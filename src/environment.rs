use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::object::Object;

/// A lexical scope. `outer` points at the enclosing scope; lookups walk the
/// chain, bindings always land in the innermost store.
#[derive(Debug, Default)]
pub struct Environment {
    store: HashMap<String, Object>,
    outer: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new() -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(Environment::default()))
    }

    pub fn new_enclosed(outer: Rc<RefCell<Environment>>) -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(Environment {
            store: HashMap::new(),
            outer: Some(outer),
        }))
    }

    pub fn get(&self, name: &str) -> Option<Object> {
        match self.store.get(name) {
            Some(obj) => Some(obj.clone()),
            None => match &self.outer {
                Some(outer) => outer.borrow().get(name),
                None => None,
            },
        }
    }

    pub fn set(&mut self, name: String, value: Object) {
        self.store.insert(name, value);
    }
}

#[cfg(test)]
mod test {
    use crate::environment::Environment;
    use crate::object::Object;

    #[test]
    fn test_get_and_set() {
        let env = Environment::new();
        env.borrow_mut().set("a".to_string(), Object::Integer(1));
        assert_eq!(env.borrow().get("a"), Some(Object::Integer(1)));
        assert_eq!(env.borrow().get("b"), None);
    }

    #[test]
    fn test_lookup_walks_the_outer_chain() {
        let outer = Environment::new();
        outer
            .borrow_mut()
            .set("a".to_string(), Object::Integer(1));

        let inner = Environment::new_enclosed(outer.clone());
        assert_eq!(inner.borrow().get("a"), Some(Object::Integer(1)));

        // bindings added to the outer scope later are still visible
        outer
            .borrow_mut()
            .set("b".to_string(), Object::Integer(2));
        assert_eq!(inner.borrow().get("b"), Some(Object::Integer(2)));
    }

    #[test]
    fn test_shadowing_is_local() {
        let outer = Environment::new();
        outer
            .borrow_mut()
            .set("a".to_string(), Object::Integer(1));

        let inner = Environment::new_enclosed(outer.clone());
        inner
            .borrow_mut()
            .set("a".to_string(), Object::Integer(10));

        assert_eq!(inner.borrow().get("a"), Some(Object::Integer(10)));
        assert_eq!(outer.borrow().get("a"), Some(Object::Integer(1)));
    }
}
