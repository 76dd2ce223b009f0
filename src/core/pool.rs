//! Pooled scratch lists.
//!
//! Candidate and target sets are built and thrown away on every targeting
//! request and every interceptor pass. `ListPool` hands out cleared vectors
//! that go back to the pool when the guard drops, so a combat turn does not
//! allocate a fresh list per request.

use std::cell::RefCell;
use std::ops::{Deref, DerefMut};

/// A pool of reusable `Vec<T>` buffers.
#[derive(Debug)]
pub struct ListPool<T> {
    free: RefCell<Vec<Vec<T>>>,
}

impl<T> Default for ListPool<T> {
    fn default() -> Self {
        Self {
            free: RefCell::new(Vec::new()),
        }
    }
}

impl<T> ListPool<T> {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow an empty list. It is returned to the pool on drop.
    pub fn take(&self) -> Pooled<'_, T> {
        let list = self.free.borrow_mut().pop().unwrap_or_default();
        Pooled { list, pool: self }
    }

    /// Number of buffers currently parked in the pool.
    #[must_use]
    pub fn idle(&self) -> usize {
        self.free.borrow().len()
    }

    fn give_back(&self, mut list: Vec<T>) {
        list.clear();
        self.free.borrow_mut().push(list);
    }
}

/// A list on loan from a [`ListPool`].
#[derive(Debug)]
pub struct Pooled<'a, T> {
    list: Vec<T>,
    pool: &'a ListPool<T>,
}

impl<T> Deref for Pooled<'_, T> {
    type Target = Vec<T>;

    fn deref(&self) -> &Vec<T> {
        &self.list
    }
}

impl<T> DerefMut for Pooled<'_, T> {
    fn deref_mut(&mut self) -> &mut Vec<T> {
        &mut self.list
    }
}

impl<T> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        self.pool.give_back(std::mem::take(&mut self.list));
    }
}
