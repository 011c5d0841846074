//! # fingerskip
//!
//! An in-memory ordered map built on a skip list, safe to share between
//! threads, that keeps duplicate keys and remembers where the last search
//! ended ("search fingers") so that runs of nearby inserts or lookups skip
//! most of the descent.
//!
//! Keys are ordered by a caller supplied [`Comparator`]. Range queries and
//! range deletes are inclusive on both ends and return an eagerly collected
//! [`Cursor`].
//!
//! ```
//! use fingerskip::{Ascending, SkipList};
//!
//! let list = SkipList::new(Ascending);
//! list.insert(10, "ten").unwrap();
//! list.insert(20, "twenty").unwrap();
//! list.insert(10, "TEN").unwrap();
//!
//! let mut tens = list.select(&10).unwrap();
//! assert_eq!(tens.count(), 2);
//! assert!(tens.advance());
//! assert_eq!(tens.value(), Some(&"TEN"));
//!
//! let removed = list.delete_range(&0, &15).unwrap();
//! assert_eq!(removed.count(), 2);
//! assert_eq!(list.count(), 1);
//! ```

#![forbid(unsafe_code)]

mod arena;
mod compare;
mod cursor;
mod error;
mod finger;
mod level;
mod node;
mod skiplist;
mod sync;

pub use crate::{
    compare::{Ascending, ByFn, Comparator, Descending, Scalar, ScalarAscending, ScalarDescending},
    cursor::{Cursor, Entry},
    error::{Error, Result},
    skiplist::{Config, SkipList, Stats, MAX_HEIGHT, P},
};

#[macro_use]
extern crate tracing;
