//! In-memory book store.
//!
//! One mutex guards the whole map together with the last identifier handed
//! out, so every operation is atomic with respect to every other one.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

use crate::model::Book;

#[derive(Debug)]
struct Inner {
    books: HashMap<String, Book>,
    last_id: u128,
}

#[derive(Debug)]
pub struct BookStore {
    inner: Mutex<Inner>,
}

impl Default for BookStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BookStore {
    /// Creates a store holding only the seed record.
    pub fn new() -> Self {
        let seed = Book::seed();
        let mut books = HashMap::new();
        books.insert(seed.id.clone(), seed);

        BookStore {
            inner: Mutex::new(Inner { books, last_id: 0 }),
        }
    }

    /// Stores `book` under a freshly generated id and returns that id.
    /// Whatever id the caller put on the book is discarded.
    pub fn insert(&self, mut book: Book) -> String {
        let mut inner = self.inner.lock();

        let id = next_id(clock_nanos(), inner.last_id);
        inner.last_id = id;

        let id = id.to_string();
        book.id = id.clone();
        inner.books.insert(id.clone(), book);
        id
    }

    /// Snapshot of every record. Order is unspecified.
    pub fn list(&self) -> Vec<Book> {
        self.inner.lock().books.values().cloned().collect()
    }

    pub fn get(&self, id: &str) -> Option<Book> {
        self.inner.lock().books.get(id).cloned()
    }

    /// Removes `id` if present. Returns whether a record was removed.
    pub fn delete(&self, id: &str) -> bool {
        self.inner.lock().books.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn clock_nanos() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default()
}

// Never hand out the same id twice, even when the clock stalls or steps back.
fn next_id(now: u128, last: u128) -> u128 {
    if now > last { now } else { last + 1 }
}
