//! Typed access to dictionary entries.
//!
//! [`DictView`] pairs a dictionary with the resolver its references point
//! into, so accessors can follow indirect references and coerce the result
//! to the expected Rust type in one step. Entries of the wrong type read as
//! absent; the mismatch is logged at `debug` level.

use crate::error::Result;
use crate::geometry::{Matrix, Rect};
use crate::library::{resolve_entry, ObjectResolver};
use crate::object::{Dictionary, Object, ObjectRef};
use crate::text_string::{decode_text_string, PdfDate};

/// A dictionary borrowed together with its object resolver.
pub struct DictView<'a, R: ObjectResolver + ?Sized> {
    dict: &'a Dictionary,
    resolver: &'a R,
}

impl<'a, R: ObjectResolver + ?Sized> Clone for DictView<'a, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, R: ObjectResolver + ?Sized> Copy for DictView<'a, R> {}

impl<'a, R: ObjectResolver + ?Sized> DictView<'a, R> {
    /// Wrap a dictionary.
    pub fn new(dict: &'a Dictionary, resolver: &'a R) -> Self {
        Self { dict, resolver }
    }

    /// The underlying dictionary.
    pub fn dict(&self) -> &'a Dictionary {
        self.dict
    }

    /// The resolver used for indirect entries.
    pub fn resolver(&self) -> &'a R {
        self.resolver
    }

    /// Raw entry, without resolving references.
    pub fn raw(&self, key: &str) -> Option<&'a Object> {
        self.dict.get(key)
    }

    /// Check whether an entry is present and not null.
    pub fn contains(&self, key: &str) -> bool {
        matches!(self.dict.get(key), Some(obj) if !obj.is_null())
    }

    /// Resolve an entry, propagating resolution failures.
    pub fn try_get(&self, key: &str) -> Result<Option<Object>> {
        resolve_entry(self.resolver, self.dict, key)
    }

    /// Resolve an entry. Resolution failures read as absent.
    pub fn get(&self, key: &str) -> Option<Object> {
        match self.try_get(key) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Failed to resolve /{}: {}", key, e);
                None
            },
        }
    }

    fn typed<T>(&self, key: &str, expected: &str, f: impl FnOnce(&Object) -> Option<T>) -> Option<T> {
        let obj = self.get(key)?;
        let value = f(&obj);
        if value.is_none() {
            log::debug!("/{} is {}, expected {}", key, obj.type_name(), expected);
        }
        value
    }

    /// Name entry.
    pub fn name(&self, key: &str) -> Option<String> {
        self.typed(key, "Name", |o| o.as_name().map(str::to_string))
    }

    /// Integer entry. Integral reals are accepted.
    pub fn integer(&self, key: &str) -> Option<i64> {
        self.typed(key, "Integer", Object::as_integer)
    }

    /// Numeric entry (integer or real).
    pub fn number(&self, key: &str) -> Option<f64> {
        self.typed(key, "Number", Object::as_number)
    }

    /// Boolean entry.
    pub fn bool(&self, key: &str) -> Option<bool> {
        self.typed(key, "Boolean", Object::as_bool)
    }

    /// Text string entry, decoded.
    pub fn text(&self, key: &str) -> Option<String> {
        self.typed(key, "String", |o| o.as_string().map(decode_text_string))
    }

    /// Text entry that may be a string or a name.
    pub fn text_or_name(&self, key: &str) -> Option<String> {
        self.typed(key, "String or Name", |o| match o {
            Object::String(s) => Some(decode_text_string(s)),
            Object::Name(n) => Some(n.clone()),
            _ => None,
        })
    }

    /// Byte string entry, undecoded.
    pub fn bytes(&self, key: &str) -> Option<Vec<u8>> {
        self.typed(key, "String", |o| o.as_string().map(<[u8]>::to_vec))
    }

    /// Date entry.
    pub fn date(&self, key: &str) -> Option<PdfDate> {
        self.typed(key, "Date", |o| {
            o.as_string()
                .map(|s| PdfDate::new(decode_text_string(s)))
        })
    }

    /// Dictionary entry (a stream's dictionary is accepted).
    pub fn dict_entry(&self, key: &str) -> Option<Dictionary> {
        self.typed(key, "Dictionary", |o| o.as_dict().cloned())
    }

    /// Array entry, with each element left unresolved.
    pub fn array(&self, key: &str) -> Option<Vec<Object>> {
        self.typed(key, "Array", |o| o.as_array().cloned())
    }

    /// Array entry of numbers. Elements are resolved individually.
    pub fn number_array(&self, key: &str) -> Option<Vec<f64>> {
        let arr = self.array(key)?;
        let nums: Option<Vec<f64>> = arr.iter().map(|o| self.resolve_item(o)?.as_number()).collect();
        if nums.is_none() {
            log::debug!("/{} contains non-numeric elements", key);
        }
        nums
    }

    /// Name array. A single name reads as a one-element array.
    pub fn name_array(&self, key: &str) -> Vec<String> {
        match self.get(key) {
            Some(Object::Name(n)) => vec![n],
            Some(Object::Array(arr)) => arr
                .iter()
                .filter_map(|o| self.resolve_item(o)?.as_name().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Text string array. A single string reads as a one-element array.
    pub fn text_array(&self, key: &str) -> Vec<String> {
        match self.get(key) {
            Some(Object::String(s)) => vec![decode_text_string(&s)],
            Some(Object::Array(arr)) => arr
                .iter()
                .filter_map(|o| self.resolve_item(o)?.as_string().map(decode_text_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Rectangle entry.
    pub fn rect(&self, key: &str) -> Option<Rect> {
        let nums = self.number_array(key)?;
        Rect::from_numbers(&nums)
    }

    /// Matrix entry.
    pub fn matrix(&self, key: &str) -> Option<Matrix> {
        let nums = self.number_array(key)?;
        let m: [f64; 6] = nums.try_into().ok()?;
        Some(Matrix(m))
    }

    /// Indirect reference held directly by the entry.
    pub fn reference(&self, key: &str) -> Option<ObjectRef> {
        self.dict.get(key).and_then(Object::as_reference)
    }

    /// Bit-flag entry decoded into a `bitflags` type.
    ///
    /// Unknown bits are retained. An absent entry reads as no flags set.
    pub fn flags<F>(&self, key: &str) -> F
    where
        F: bitflags::Flags<Bits = u32>,
    {
        F::from_bits_retain(self.integer(key).map(|v| v as u32).unwrap_or(0))
    }

    /// Resolve an array element.
    pub fn resolve_item(&self, obj: &Object) -> Option<Object> {
        match crate::library::resolve(self.resolver, obj) {
            Ok(Object::Null) => None,
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Failed to resolve array element: {}", e);
                None
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::ObjectStore;

    bitflags::bitflags! {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        struct TestFlags: u32 {
            const A = 1;
            const B = 1 << 1;
        }
    }

    fn sample(store: &mut ObjectStore) -> Dictionary {
        let width = store.add(Object::Integer(12));
        let mut dict = Dictionary::new();
        dict.insert("Type".into(), Object::name("Annot"));
        dict.insert("W".into(), Object::Reference(width));
        dict.insert("T".into(), Object::text("Name"));
        dict.insert("Rect".into(), Object::number_array(&[10.0, 10.0, 0.0, 0.0]));
        dict.insert(
            "Opt".into(),
            Object::Array(vec![Object::text("a"), Object::Integer(1), Object::text("b")]),
        );
        dict.insert("F".into(), Object::Integer(0b1011));
        dict.insert("N".into(), Object::Null);
        dict
    }

    #[test]
    fn test_typed_accessors() {
        let mut store = ObjectStore::new();
        let dict = sample(&mut store);
        let view = DictView::new(&dict, &store);

        assert_eq!(view.name("Type").as_deref(), Some("Annot"));
        assert_eq!(view.integer("W"), Some(12));
        assert_eq!(view.number("W"), Some(12.0));
        assert_eq!(view.text("T").as_deref(), Some("Name"));
        assert_eq!(view.rect("Rect"), Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn test_wrong_type_reads_as_absent() {
        let mut store = ObjectStore::new();
        let dict = sample(&mut store);
        let view = DictView::new(&dict, &store);

        assert_eq!(view.integer("Type"), None);
        assert_eq!(view.name("T"), None);
        assert_eq!(view.bool("Missing"), None);
    }

    #[test]
    fn test_null_entry_is_absent() {
        let mut store = ObjectStore::new();
        let dict = sample(&mut store);
        let view = DictView::new(&dict, &store);
        assert!(!view.contains("N"));
        assert!(view.get("N").is_none());
        assert!(view.contains("T"));
    }

    #[test]
    fn test_text_array_skips_non_strings() {
        let mut store = ObjectStore::new();
        let dict = sample(&mut store);
        let view = DictView::new(&dict, &store);
        assert_eq!(view.text_array("Opt"), vec!["a", "b"]);
        assert_eq!(view.text_array("T"), vec!["Name"]);
    }

    #[test]
    fn test_flags_retain_unknown_bits() {
        let mut store = ObjectStore::new();
        let dict = sample(&mut store);
        let view = DictView::new(&dict, &store);
        let flags: TestFlags = view.flags("F");
        assert!(flags.contains(TestFlags::A | TestFlags::B));
        assert_eq!(flags.bits(), 0b1011);

        let none: TestFlags = view.flags("Missing");
        assert!(none.is_empty());
    }
}
