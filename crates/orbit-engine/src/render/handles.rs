use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// A GPU-side object owned by a [`HandleTable`].
pub trait GpuResource {
    /// Releases the GPU memory behind the resource.
    fn destroy(self);
}

/// Opaque id of a resource of type `T`.
pub struct Handle<T> {
    id: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    #[inline]
    fn new(id: u32) -> Self {
        Self { id, _marker: PhantomData }
    }

    #[inline]
    pub fn id(self) -> u32 {
        self.id
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = std::any::type_name::<T>().rsplit("::").next().unwrap_or("?");
        write!(f, "Handle<{name}>({})", self.id)
    }
}

/// Live resources of one kind, keyed by handle.
///
/// Ids are never reused, so a stale handle can't reach a newer resource.
/// Iteration (and therefore [`destroy_all`](Self::destroy_all)) follows
/// creation order.
pub struct HandleTable<T> {
    next_id: u32,
    live: BTreeMap<u32, T>,
}

impl<T> HandleTable<T> {
    pub fn new() -> Self {
        Self { next_id: 0, live: BTreeMap::new() }
    }

    pub fn insert(&mut self, resource: T) -> Handle<T> {
        let id = self.next_id;
        self.next_id += 1;
        self.live.insert(id, resource);
        Handle::new(id)
    }

    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        self.live.get(&handle.id)
    }

    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        self.live.get_mut(&handle.id)
    }

    pub fn contains(&self, handle: Handle<T>) -> bool {
        self.live.contains_key(&handle.id)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.live.values_mut()
    }
}

impl<T: GpuResource> HandleTable<T> {
    /// Destroys one resource. Returns `false` for unknown or already destroyed handles.
    pub fn destroy(&mut self, handle: Handle<T>) -> bool {
        match self.live.remove(&handle.id) {
            Some(resource) => {
                resource.destroy();
                true
            }
            None => false,
        }
    }

    /// Destroys every live resource; returns how many were destroyed.
    pub fn destroy_all(&mut self) -> usize {
        let live = std::mem::take(&mut self.live);
        let count = live.len();
        live.into_values().for_each(GpuResource::destroy);
        count
    }
}

impl<T> Default for HandleTable<T> {
    fn default() -> Self {
        Self::new()
    }
}
