//! Reusable object pool
//!
//! Projectiles and particles churn every frame. Instead of dropping and
//! reallocating them, dead instances are reset and parked on a free list.

/// An object that can be recycled by a [`Pool`]
///
/// `Default` defines the documented reset state. A released object is
/// returned to exactly that state before it can be handed out again.
pub trait Poolable: Default {
    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Free-list allocator for [`Poolable`] objects
#[derive(Debug)]
pub struct Pool<T: Poolable> {
    free: Vec<T>,
    /// Number of instances preallocated up front
    reserved: usize,
    in_use: usize,
    /// Instances allocated because the free list was empty
    overflow: usize,
}

impl<T: Poolable> Pool<T> {
    /// Create a pool with `reserved` instances ready to hand out
    pub fn with_capacity(reserved: usize) -> Self {
        Self {
            free: (0..reserved).map(|_| T::default()).collect(),
            reserved,
            in_use: 0,
            overflow: 0,
        }
    }

    /// Take a reset instance, allocating a new one if none are free
    pub fn acquire(&mut self) -> T {
        let obj = match self.free.pop() {
            Some(obj) => obj,
            None => {
                self.overflow += 1;
                log::warn!(
                    "{} pool exceeded {} reserved instances ({} in use)",
                    std::any::type_name::<T>(),
                    self.reserved,
                    self.in_use + 1
                );
                T::default()
            }
        };
        self.in_use += 1;
        obj
    }

    /// Reset an instance and park it on the free list
    pub fn release(&mut self, mut obj: T) {
        obj.reset();
        self.in_use = self.in_use.saturating_sub(1);
        self.free.push(obj);
    }

    /// Instances currently handed out
    pub fn in_use(&self) -> usize {
        self.in_use
    }

    /// Instances waiting on the free list
    pub fn available(&self) -> usize {
        self.free.len()
    }

    /// How many times the pool had to allocate past its free list
    pub fn overflow_count(&self) -> usize {
        self.overflow
    }
}
