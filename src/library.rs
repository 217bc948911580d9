//! Object resolution.
//!
//! The crate never parses PDF syntax itself. Indirect objects come from an
//! [`ObjectResolver`], which a PDF reader implements over its cross-reference
//! table. [`ObjectStore`] is an in-memory resolver for object tables that have
//! already been loaded, and for building documents programmatically.

use crate::error::{Error, Result};
use crate::object::{Dictionary, Object, ObjectRef};
use std::collections::{HashMap, HashSet};

/// Default limit for reference chains followed by [`resolve`].
pub const MAX_REFERENCE_CHAIN: u32 = 32;

/// Source of indirect objects.
pub trait ObjectResolver {
    /// Load an object by its reference.
    ///
    /// Returns [`Error::ObjectNotFound`] when the reference is not present.
    fn load_object(&self, obj_ref: ObjectRef) -> Result<Object>;

    /// Longest reference chain [`resolve`] follows through this resolver.
    fn max_reference_chain(&self) -> u32 {
        MAX_REFERENCE_CHAIN
    }
}

impl<T: ObjectResolver + ?Sized> ObjectResolver for &T {
    fn load_object(&self, obj_ref: ObjectRef) -> Result<Object> {
        (**self).load_object(obj_ref)
    }

    fn max_reference_chain(&self) -> u32 {
        (**self).max_reference_chain()
    }
}

/// A resolver with its own reference chain limit.
///
/// Built from [`ModelOptions::max_reference_chain`](crate::config::ModelOptions)
/// by the form and page loaders.
pub struct ChainLimited<'a, R: ObjectResolver + ?Sized> {
    inner: &'a R,
    max_chain: u32,
}

impl<'a, R: ObjectResolver + ?Sized> ChainLimited<'a, R> {
    /// Wrap `inner`, following at most `max_chain` references per lookup.
    pub fn new(inner: &'a R, max_chain: u32) -> Self {
        Self { inner, max_chain }
    }
}

impl<R: ObjectResolver + ?Sized> ObjectResolver for ChainLimited<'_, R> {
    fn load_object(&self, obj_ref: ObjectRef) -> Result<Object> {
        self.inner.load_object(obj_ref)
    }

    fn max_reference_chain(&self) -> u32 {
        self.max_chain
    }
}

/// Resolve an object to a direct value, following reference chains.
///
/// Chains such as `5 0 R -> 6 0 R -> << ... >>` are followed up to the
/// resolver's [`ObjectResolver::max_reference_chain`] hops; a chain that revisits an object fails with
/// [`Error::CircularReference`].
pub fn resolve<R: ObjectResolver + ?Sized>(resolver: &R, obj: &Object) -> Result<Object> {
    resolve_with_limit(resolver, obj, resolver.max_reference_chain())
}

/// Resolve an object with an explicit chain limit.
pub fn resolve_with_limit<R: ObjectResolver + ?Sized>(
    resolver: &R,
    obj: &Object,
    max_chain: u32,
) -> Result<Object> {
    let mut current = match obj {
        Object::Reference(r) => *r,
        other => return Ok(other.clone()),
    };

    let mut visited = HashSet::new();
    loop {
        if !visited.insert(current) {
            log::error!("Circular reference chain at object {}", current);
            return Err(Error::CircularReference(current));
        }
        if visited.len() as u32 > max_chain {
            return Err(Error::RecursionLimitExceeded(max_chain));
        }

        log::trace!("Resolving object {}", current);
        match resolver.load_object(current)? {
            Object::Reference(next) => current = next,
            value => return Ok(value),
        }
    }
}

/// Resolve an object and require a dictionary (or stream dictionary).
pub fn resolve_dict<R: ObjectResolver + ?Sized>(resolver: &R, obj: &Object) -> Result<Dictionary> {
    match resolve(resolver, obj)? {
        Object::Dictionary(d) => Ok(d),
        Object::Stream { dict, .. } => Ok(dict),
        other => Err(Error::invalid_type("Dictionary", &other)),
    }
}

/// Resolve an object and require an array.
pub fn resolve_array<R: ObjectResolver + ?Sized>(resolver: &R, obj: &Object) -> Result<Vec<Object>> {
    match resolve(resolver, obj)? {
        Object::Array(arr) => Ok(arr),
        other => Err(Error::invalid_type("Array", &other)),
    }
}

/// Resolve a dictionary entry.
///
/// Absent entries, explicit `null` values and references to missing objects
/// all resolve to `None`; per ISO 32000-1:2008 Section 7.3.10 a reference to
/// a nonexistent object is treated as the null object.
pub fn resolve_entry<R: ObjectResolver + ?Sized>(
    resolver: &R,
    dict: &Dictionary,
    key: &str,
) -> Result<Option<Object>> {
    let raw = match dict.get(key) {
        Some(obj) => obj,
        None => return Ok(None),
    };

    match resolve(resolver, raw) {
        Ok(Object::Null) => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(Error::ObjectNotFound(id, gen)) => {
            log::warn!("/{} references missing object {} {} R, treating as null", key, id, gen);
            Ok(None)
        },
        Err(e) => Err(e),
    }
}

/// In-memory object table.
///
/// # Example
///
/// ```
/// use pdf_acroform::library::{ObjectResolver, ObjectStore};
/// use pdf_acroform::object::Object;
///
/// let mut store = ObjectStore::new();
/// let r = store.add(Object::Integer(7));
/// assert_eq!(store.load_object(r).unwrap(), Object::Integer(7));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ObjectStore {
    objects: HashMap<ObjectRef, Object>,
    next_id: u32,
    catalog: Option<ObjectRef>,
}

impl ObjectStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            objects: HashMap::new(),
            next_id: 1,
            catalog: None,
        }
    }

    /// Insert an object under an explicit reference, replacing any previous value.
    pub fn insert(&mut self, obj_ref: ObjectRef, obj: Object) {
        if obj_ref.id >= self.next_id {
            self.next_id = obj_ref.id + 1;
        }
        self.objects.insert(obj_ref, obj);
    }

    /// Add an object under a freshly allocated reference.
    pub fn add(&mut self, obj: Object) -> ObjectRef {
        let obj_ref = ObjectRef::new(self.next_id.max(1), 0);
        self.insert(obj_ref, obj);
        obj_ref
    }

    /// Replace an existing object.
    pub fn update(&mut self, obj_ref: ObjectRef, obj: Object) -> Result<()> {
        match self.objects.get_mut(&obj_ref) {
            Some(slot) => {
                *slot = obj;
                Ok(())
            },
            None => Err(Error::ObjectNotFound(obj_ref.id, obj_ref.gen)),
        }
    }

    /// Mutable access to a stored dictionary (or stream dictionary).
    pub fn dict_mut(&mut self, obj_ref: ObjectRef) -> Result<&mut Dictionary> {
        let obj = self
            .objects
            .get_mut(&obj_ref)
            .ok_or(Error::ObjectNotFound(obj_ref.id, obj_ref.gen))?;
        let type_name = obj.type_name();
        obj.as_dict_mut().ok_or_else(|| Error::InvalidObjectType {
            expected: "Dictionary".to_string(),
            found: type_name.to_string(),
        })
    }

    /// Borrow a stored object.
    pub fn get(&self, obj_ref: ObjectRef) -> Option<&Object> {
        self.objects.get(&obj_ref)
    }

    /// Remove an object.
    pub fn remove(&mut self, obj_ref: ObjectRef) -> Option<Object> {
        self.objects.remove(&obj_ref)
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Set the document catalog reference.
    pub fn set_catalog(&mut self, catalog: ObjectRef) {
        self.catalog = Some(catalog);
    }

    /// Reference of the document catalog, when set.
    pub fn catalog_ref(&self) -> Option<ObjectRef> {
        self.catalog
    }

    /// Load the document catalog dictionary.
    pub fn catalog(&self) -> Result<Dictionary> {
        let catalog = self
            .catalog
            .ok_or_else(|| Error::InvalidPdf("No document catalog set".to_string()))?;
        resolve_dict(self, &Object::Reference(catalog))
    }
}

impl ObjectResolver for ObjectStore {
    fn load_object(&self, obj_ref: ObjectRef) -> Result<Object> {
        self.objects
            .get(&obj_ref)
            .cloned()
            .ok_or(Error::ObjectNotFound(obj_ref.id, obj_ref.gen))
    }
}
