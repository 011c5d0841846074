#![cfg(not(loom))]

use std::sync::{Arc, Barrier};
use std::thread;

use fingerskip::{Ascending, SkipList};

mod common;
extern crate fingerskip;

#[test]
fn test_concurrent_inserts_and_selects() {
    init!();

    let writers = 4;
    let per_writer = 2_000i64;
    let list = Arc::new(SkipList::new(Ascending));
    let barrier = Arc::new(Barrier::new(writers * 2));

    let mut handles = vec![];
    for w in 0..writers as i64 {
        let list = Arc::clone(&list);
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            for i in 0..per_writer {
                list.insert(i * writers as i64 + w, w).unwrap();
            }
        }));
    }
    for _ in 0..writers {
        let list = Arc::clone(&list);
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            for i in 0..per_writer {
                let found = list.select_range(&i, &(i + 50)).unwrap();
                let keys = common::keys(found);
                assert!(keys.windows(2).all(|w| w[0] <= w[1]));
                assert!(keys.iter().all(|k| (i..=i + 50).contains(k)));
            }
        }));
    }
    for handle in handles {
        handle.join().expect("thread panicked");
    }

    let total = writers as i64 * per_writer;
    assert_eq!(list.count(), total as usize);
    assert_eq!(list.real_count(), total as usize);
    assert_eq!(common::keys(list.snapshot()), (0..total).collect::<Vec<_>>());
}

#[test]
fn test_concurrent_deletes_and_selects() {
    init!();

    let list = Arc::new(SkipList::new(Ascending));
    for key in 0..10_000i64 {
        list.insert(key, key).unwrap();
    }

    let deleter = {
        let list = Arc::clone(&list);
        thread::spawn(move || {
            for lo in (0..10_000i64).step_by(100) {
                let removed = list.delete_range(&lo, &(lo + 49)).unwrap();
                assert_eq!(removed.count(), 50);
            }
        })
    };
    let readers: Vec<_> = (0..3)
        .map(|r| {
            let list = Arc::clone(&list);
            thread::spawn(move || {
                for round in 0..2_000i64 {
                    let lo = (round * 37 + r * 1_000) % 10_000;
                    let found = list.select_range(&lo, &(lo + 20)).unwrap();
                    for entry in found {
                        assert_eq!(*entry.key(), *entry.value());
                    }
                }
            })
        })
        .collect();

    deleter.join().expect("deleter panicked");
    for reader in readers {
        reader.join().expect("reader panicked");
    }

    assert_eq!(list.count(), 5_000);
    assert!(common::keys(list.snapshot())
        .iter()
        .all(|k| k % 100 >= 50));
}
