use crate::core::Result;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard, TryLockError};

/// Shared handle to one entity held by a file set.
///
/// Clones point at the same entity, so a field changed through any clone is
/// what the owning set will persist. Equality is identity: two handles are
/// equal only when they refer to the same allocation, regardless of the
/// entity's field values.
pub struct EntityRef<T> {
    inner: Arc<RwLock<T>>,
}

impl<T> EntityRef<T> {
    pub fn new(entity: T) -> Self {
        Self {
            inner: Arc::new(RwLock::new(entity)),
        }
    }

    pub fn read(&self) -> Result<RwLockReadGuard<'_, T>> {
        Ok(self.inner.read()?)
    }

    pub fn write(&self) -> Result<RwLockWriteGuard<'_, T>> {
        Ok(self.inner.write()?)
    }

    /// Runs `f` against a shared borrow of the entity.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> Result<R> {
        let guard = self.read()?;
        Ok(f(&*guard))
    }

    /// Runs `f` against an exclusive borrow of the entity.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R> {
        let mut guard = self.write()?;
        Ok(f(&mut *guard))
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// True once a thread panicked while holding this entity's write guard.
    pub fn is_poisoned(&self) -> bool {
        self.inner.is_poisoned()
    }
}

impl<T> Clone for EntityRef<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> PartialEq for EntityRef<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T> Eq for EntityRef<T> {}

impl<T> From<T> for EntityRef<T> {
    fn from(entity: T) -> Self {
        Self::new(entity)
    }
}

impl<T: fmt::Debug> fmt::Debug for EntityRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_read() {
            Ok(guard) => f.debug_tuple("EntityRef").field(&*guard).finish(),
            Err(_) => f.write_str("EntityRef(<locked>)"),
        }
    }
}

/// Serializes the entity itself. Never blocks: an entity whose write guard is
/// still held, or whose lock is poisoned, fails with a serializer error.
/// [`FileSet::save`](crate::set::FileSet::save) checks for poisoning first and
/// reports it as [`FileSetError::LockError`](crate::core::FileSetError::LockError).
impl<T: Serialize> Serialize for EntityRef<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let guard = match self.inner.try_read() {
            Ok(guard) => guard,
            Err(TryLockError::WouldBlock) => {
                return Err(<S::Error as serde::ser::Error>::custom(
                    "entity is locked for writing",
                ));
            }
            Err(TryLockError::Poisoned(err)) => {
                return Err(<S::Error as serde::ser::Error>::custom(format!(
                    "entity lock poisoned: {}",
                    err
                )));
            }
        };
        guard.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for EntityRef<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        T::deserialize(deserializer).map(EntityRef::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Tag {
        label: String,
    }

    #[test]
    fn test_clones_share_the_entity() {
        let tag = EntityRef::new(Tag { label: "draft".to_string() });
        let alias = tag.clone();

        alias.with_mut(|t| t.label = "final".to_string()).unwrap();

        assert_eq!(tag.read().unwrap().label, "final");
        assert_eq!(tag, alias);
    }

    #[test]
    fn test_equal_fields_are_not_identical() {
        let a = EntityRef::new(Tag { label: "same".to_string() });
        let b = EntityRef::new(Tag { label: "same".to_string() });
        assert_ne!(a, b);
    }

    #[test]
    fn test_serializes_as_inner_value() {
        let tag = EntityRef::new(Tag { label: "x".to_string() });
        assert_eq!(serde_json::to_string(&tag).unwrap(), r#"{"label":"x"}"#);

        let back: EntityRef<Tag> = serde_json::from_str(r#"{"label":"y"}"#).unwrap();
        assert_eq!(back.with(|t| t.label.clone()).unwrap(), "y");
    }

    #[test]
    fn test_serialize_with_write_guard_held_fails_fast() {
        let tag = EntityRef::new(Tag { label: "busy".to_string() });
        let _guard = tag.write().unwrap();

        let err = serde_json::to_string(&tag).unwrap_err();
        assert!(err.to_string().contains("locked for writing"));
    }

    #[test]
    fn test_poisoned_entity_is_reported() {
        let tag = EntityRef::new(Tag { label: "x".to_string() });
        assert!(!tag.is_poisoned());

        let alias = tag.clone();
        let _ = std::thread::spawn(move || {
            let _guard = alias.write().unwrap();
            panic!("poison");
        })
        .join();

        assert!(tag.is_poisoned());
        assert!(serde_json::to_string(&tag).is_err());
    }
}
