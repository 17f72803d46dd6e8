//! The document-level container of root objects.

use std::sync::Arc;

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::model::property::Visit;
use crate::model::{Path, Ref, Registry, ShaclObject};
use crate::validate::ErrorHandler;

/// Root objects of one document, together with the registry they belong to.
///
/// Roots are held as object references so that a walk reports them the same
/// way as nested objects. Decoding and encoding live in
/// [`codec::document`](crate::codec::document).
#[derive(Debug, Clone)]
pub struct ObjectSet {
    registry: Arc<Registry>,
    roots: Vec<Ref>,
}

fn object_key(obj: &Arc<ShaclObject>) -> *const ShaclObject {
    Arc::as_ptr(obj)
}

/// Visits `r` and, for an object not seen before, everything reachable
/// from it.
fn walk_ref<'a>(
    r: &'a Ref,
    path: &Path,
    seen: &mut FxHashSet<*const ShaclObject>,
    visit: &mut dyn FnMut(&Path, Visit<'a>),
) {
    match r {
        Ref::Object(obj) => {
            if !seen.insert(object_key(obj)) {
                return;
            }
            visit(path, Visit::Ref(r));
            obj.walk(path, &mut |sub_path: &Path, value: Visit<'a>| match value {
                Visit::Ref(inner) => walk_ref(inner, sub_path, &mut *seen, &mut *visit),
                other => visit(sub_path, other),
            });
        }
        _ => visit(path, Visit::Ref(r)),
    }
}

impl ObjectSet {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            roots: Vec::new(),
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Appends a root object.
    pub fn add(&mut self, obj: impl Into<Arc<ShaclObject>>) {
        self.roots.push(Ref::Object(obj.into()));
    }

    pub(crate) fn extend(&mut self, objects: Vec<Arc<ShaclObject>>) {
        self.roots.extend(objects.into_iter().map(Ref::Object));
    }

    /// Root objects in insertion order.
    pub fn objects(&self) -> impl Iterator<Item = &Arc<ShaclObject>> + '_ {
        self.roots.iter().filter_map(Ref::get_obj)
    }

    /// Roots as the object references a walk reports them as.
    pub fn roots(&self) -> &[Ref] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Depth-first traversal of every root and everything it references.
    ///
    /// Root `idx` is visited as an object reference at `.[idx]` and then
    /// descended into. Every object reference is visited and descended into
    /// once, keyed by object identity rather than content. IRI references
    /// are visited but not followed.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&Path, Visit<'a>)) {
        let mut seen = FxHashSet::default();
        let root = Path::root();
        for (idx, r) in self.roots.iter().enumerate() {
            walk_ref(r, &root.push_index(idx), &mut seen, visit);
        }
    }

    /// Calls `f` for every distinct reachable object, roots included, in
    /// walk order.
    pub fn for_each_object<'a>(&'a self, mut f: impl FnMut(&Path, &'a ShaclObject)) {
        self.walk(&mut |path: &Path, value: Visit<'a>| {
            if let Visit::Ref(Ref::Object(obj)) = value {
                f(path, obj.as_ref());
            }
        });
    }

    /// Every distinct reachable object of class `iri` (or, with
    /// `match_subclass`, of a class deriving from it).
    pub fn objects_of_type(&self, iri: &str, match_subclass: bool) -> Vec<&ShaclObject> {
        let Some(class) = self.registry.get(iri) else {
            return Vec::new();
        };
        let target = class.iri();
        let mut found = Vec::new();
        self.for_each_object(|_, obj| {
            let matches = if match_subclass {
                obj.class().is_subclass_of(target)
            } else {
                obj.class().iri() == target
            };
            if matches {
                found.push(obj);
            }
        });
        found
    }

    /// Validates every reachable object once, reporting all failures.
    pub fn validate(&self, handler: &mut dyn ErrorHandler) -> bool {
        let mut valid = true;
        let mut objects = 0usize;
        self.for_each_object(|path, obj| {
            objects += 1;
            if !obj.validate(path, &mut *handler) {
                valid = false;
            }
        });
        debug!(objects, valid, "validated object set");
        valid
    }
}
