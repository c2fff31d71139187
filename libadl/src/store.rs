//! The in-memory object graph.
//!
//! Objects live in an arena indexed by `Handle`. Parent, supertype, aspect
//! and alias links are all handles, so the graph may be cyclic (`TOP` and
//! `Object` refer to each other) without any reference counting; dropping
//! the store frees every object at once. Nodes are never freed individually.

use crate::value::Value;

/// An opaque reference to an object in a [`Store`].
///
/// Handles are comparable and hashable; absence is `Option<Handle>`.
/// A handle is only meaningful to the store that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(u32);

impl Handle {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
struct Node {
    parent: Option<Handle>,
    name: String,
    supertype: Option<Handle>,
    aspect: Option<Handle>,
    alias_for: Option<Handle>,
    children: Vec<Handle>,
    is_array: bool,
    is_final: bool,
    value: Option<Value>,
}

/// The object graph, bootstrapped with the built-in objects.
///
/// `TOP` is the root of the containment hierarchy and `Object` the root of
/// the supertype hierarchy; they are mutually linked. The other built-ins
/// (`Regular Expression`, `Syntax`, `Reference`, `Assignment`) give parsed
/// definitions their standard supertypes.
#[derive(Debug)]
pub struct Store {
    nodes: Vec<Node>,
    top: Handle,
    object: Handle,
}

impl Store {
    pub fn new() -> Self {
        let mut store = Store {
            nodes: Vec::new(),
            top: Handle(0),
            object: Handle(1),
        };
        let top = store.alloc(None, "TOP", None, None);
        let object = store.alloc(Some(top), "Object", None, None);
        store.nodes[top.index()].supertype = Some(object);
        store.nodes[top.index()].children.push(object);
        store.top = top;
        store.object = object;

        let regexp = store.create(top, "Regular Expression", object, None);
        store.create(object, "Syntax", regexp, None);
        store.create(top, "Reference", object, None);
        store.create(top, "Assignment", object, None);
        store
    }

    fn alloc(
        &mut self,
        parent: Option<Handle>,
        name: &str,
        supertype: Option<Handle>,
        aspect: Option<Handle>,
    ) -> Handle {
        let handle = Handle(self.nodes.len() as u32);
        self.nodes.push(Node {
            parent,
            name: name.to_string(),
            supertype,
            aspect,
            alias_for: None,
            children: Vec::new(),
            is_array: false,
            is_final: false,
            value: None,
        });
        handle
    }

    /// Create a new object under `parent`.
    pub fn create(
        &mut self,
        parent: Handle,
        name: &str,
        supertype: Handle,
        aspect: Option<Handle>,
    ) -> Handle {
        let handle = self.alloc(Some(parent), name, Some(supertype), aspect);
        self.nodes[parent.index()].children.push(handle);
        handle
    }

    /// The root of the containment hierarchy.
    pub fn top(&self) -> Handle {
        self.top
    }

    /// The root of the supertype hierarchy.
    pub fn object_root(&self) -> Handle {
        self.object
    }

    pub fn parent(&self, h: Handle) -> Option<Handle> {
        self.nodes[h.index()].parent
    }

    pub fn name(&self, h: Handle) -> &str {
        &self.nodes[h.index()].name
    }

    pub fn supertype(&self, h: Handle) -> Option<Handle> {
        self.nodes[h.index()].supertype
    }

    pub fn aspect(&self, h: Handle) -> Option<Handle> {
        self.nodes[h.index()].aspect
    }

    pub fn alias_for(&self, h: Handle) -> Option<Handle> {
        self.nodes[h.index()].alias_for
    }

    pub fn children(&self, h: Handle) -> &[Handle] {
        &self.nodes[h.index()].children
    }

    pub fn is_array(&self, h: Handle) -> bool {
        self.nodes[h.index()].is_array
    }

    pub fn is_final(&self, h: Handle) -> bool {
        self.nodes[h.index()].is_final
    }

    pub fn value(&self, h: Handle) -> Option<&Value> {
        self.nodes[h.index()].value.as_ref()
    }

    /// Find a direct child by name. Supertype-chain and alias-aware search
    /// belongs to the resolver, not the store.
    pub fn lookup(&self, parent: Handle, name: &str) -> Option<Handle> {
        self.nodes[parent.index()]
            .children
            .iter()
            .copied()
            .find(|&c| self.nodes[c.index()].name == name)
    }

    pub fn set_array(&mut self, h: Handle) {
        self.nodes[h.index()].is_array = true;
    }

    pub fn set_alias(&mut self, h: Handle, target: Handle) {
        self.nodes[h.index()].alias_for = Some(target);
    }

    pub fn set_value(&mut self, h: Handle, value: Value, is_final: bool) {
        let node = &mut self.nodes[h.index()];
        node.value = Some(value);
        node.is_final = is_final;
    }

    /// The dotted pathname of an object, relative to `TOP`.
    pub fn pathname(&self, h: Handle) -> String {
        let name = self.name(h);
        let shown = if name.is_empty() { "<anonymous>" } else { name };
        match self.parent(h) {
            // TOP itself is not a prefix of its children's pathnames
            Some(p) if self.parent(p).is_some() => format!("{}.{}", self.pathname(p), shown),
            _ => shown.to_string(),
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Store::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_shape() {
        let store = Store::new();
        let top = store.top();
        let object = store.object_root();

        assert_eq!(store.name(top), "TOP");
        assert_eq!(store.parent(top), None);
        assert_eq!(store.supertype(top), Some(object));

        assert_eq!(store.name(object), "Object");
        assert_eq!(store.parent(object), Some(top));
        assert_eq!(store.supertype(object), None);

        let regexp = store.lookup(top, "Regular Expression").unwrap();
        let syntax = store.lookup(object, "Syntax").unwrap();
        assert_eq!(store.supertype(syntax), Some(regexp));
        assert_eq!(store.supertype(regexp), Some(object));

        for builtin in ["Reference", "Assignment"] {
            let h = store.lookup(top, builtin).unwrap();
            assert_eq!(store.supertype(h), Some(object));
        }
    }

    #[test]
    fn test_create_and_lookup() {
        let mut store = Store::new();
        let top = store.top();
        let object = store.object_root();

        let colour = store.create(top, "Colour", object, None);
        assert_eq!(store.lookup(top, "Colour"), Some(colour));
        assert_eq!(store.lookup(top, "Color"), None);
        assert!(store.children(top).contains(&colour));

        let red = store.create(colour, "Warm Red", colour, None);
        assert_eq!(store.lookup(colour, "Warm Red"), Some(red));
        assert_eq!(store.parent(red), Some(colour));
    }

    #[test]
    fn test_pathname() {
        let mut store = Store::new();
        let top = store.top();
        let object = store.object_root();
        let a = store.create(top, "A", object, None);
        let b = store.create(a, "B", object, None);
        let anon = store.create(b, "", object, None);

        assert_eq!(store.pathname(top), "TOP");
        assert_eq!(store.pathname(a), "A");
        assert_eq!(store.pathname(b), "A.B");
        assert_eq!(store.pathname(anon), "A.B.<anonymous>");
    }

    #[test]
    fn test_values_and_flags() {
        let mut store = Store::new();
        let top = store.top();
        let object = store.object_root();
        let x = store.create(top, "X", object, None);

        assert_eq!(store.value(x), None);
        store.set_value(x, Value::Number("7".into()), true);
        assert_eq!(store.value(x), Some(&Value::Number("7".into())));
        assert!(store.is_final(x));

        assert!(!store.is_array(x));
        store.set_array(x);
        assert!(store.is_array(x));

        let y = store.create(top, "Y", object, None);
        store.set_alias(y, x);
        assert_eq!(store.alias_for(y), Some(x));
    }
}
