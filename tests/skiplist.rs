use fingerskip::{Ascending, Config, Descending, Error, Scalar, ScalarAscending, ScalarDescending, SkipList};

mod common;
extern crate fingerskip;

use common::{keys, random_keys};

#[test]
fn test_insert_int_ascending() {
    init!();

    let list = SkipList::new(Ascending);
    for (i, key) in random_keys(20_000, 20_000, 1).into_iter().enumerate() {
        list.insert(key, i).expect("insert should succeed");
    }
    assert_eq!(list.count(), 20_000);
    assert_eq!(list.real_count(), 20_000);

    let all = keys(list.snapshot());
    assert!(all.windows(2).all(|w| w[0] <= w[1]), "keys out of order");
}

#[test]
fn test_insert_int_descending() {
    init!();

    let list = SkipList::new(Descending);
    for (i, key) in random_keys(20_000, 20_000, 2).into_iter().enumerate() {
        list.insert(key, i).expect("insert should succeed");
    }
    assert_eq!(list.real_count(), list.count());

    let all = keys(list.snapshot());
    assert!(all.windows(2).all(|w| w[0] >= w[1]), "keys out of order");
}

#[test]
fn test_insert_string_both_directions() {
    init!();

    let words: Vec<String> = random_keys(2_000, 1_000_000, 3)
        .into_iter()
        .map(|k| format!("key-{}", k))
        .collect();

    let asc = SkipList::new(ScalarAscending);
    let desc = SkipList::new(ScalarDescending);
    for word in &words {
        asc.insert(Scalar::from(word.as_str()), ()).unwrap();
        desc.insert(Scalar::from(word.as_str()), ()).unwrap();
    }

    let mut sorted = words.clone();
    sorted.sort();
    let got: Vec<Scalar> = asc.snapshot().into_iter().map(|e| e.key().clone()).collect();
    let want: Vec<Scalar> = sorted.iter().map(|w| Scalar::from(w.as_str())).collect();
    assert_eq!(got, want);

    let got: Vec<Scalar> = desc.snapshot().into_iter().map(|e| e.key().clone()).collect();
    let want: Vec<Scalar> = want.into_iter().rev().collect();
    assert_eq!(got, want);
}

fn scenario_a() -> SkipList<i64, i64> {
    let list = SkipList::new(Ascending);
    for (k, v) in [
        (1, 1),
        (1, 2),
        (2, 1),
        (2, 2),
        (2, 3),
        (2, 4),
        (2, 5),
        (1, 3),
        (1, 4),
        (1, 5),
    ] {
        list.insert(k, v).unwrap();
    }
    list
}

#[test]
fn test_select_int() {
    init!();

    let list = scenario_a();
    let mut found = list.select(&1).unwrap();
    assert_eq!(found.count(), 5);

    let mut values = vec![];
    while found.advance() {
        assert_eq!(found.key(), Some(&1));
        values.push(*found.value().unwrap());
    }
    // duplicates come back newest first
    assert_eq!(values, vec![5, 4, 3, 2, 1]);

    found.rewind();
    assert!(found.advance());
    assert_eq!(found.value(), Some(&5));
}

#[test]
fn test_select_range_int() {
    init!();

    let list = SkipList::new(Ascending);
    for (k, v) in [
        (1, 10),
        (1, 20),
        (2, 1),
        (2, 2),
        (2, 3),
        (2, 4),
        (2, 5),
        (1, 30),
        (1, 40),
        (1, 50),
        (3, 5),
        (4, 5),
        (5, 5),
        (6, 5),
    ] {
        list.insert(k, v).unwrap();
    }

    let found = list.select_range(&1, &2).unwrap();
    assert_eq!(found.count(), 10);
    assert_eq!(keys(found), vec![1, 1, 1, 1, 1, 2, 2, 2, 2, 2]);

    assert_eq!(list.select_range(&7, &100).unwrap().count(), 0);
    assert_eq!(list.select_range(&2, &1).unwrap().count(), 0, "empty when lo > hi");
    assert_eq!(list.select(&4).unwrap().count(), 1);
}

#[test]
fn test_select_range_matches_independent_count() {
    init!();

    let count = 10_000;
    let inserted = random_keys(count, count as i64, 4);
    let total = inserted.iter().filter(|&&k| (100..=2000).contains(&k)).count();

    let list = SkipList::new(Ascending);
    for (i, &key) in inserted.iter().enumerate() {
        list.insert(key, i).unwrap();
    }

    let found = list.select_range(&100, &2000).unwrap();
    assert_eq!(found.count(), total);
    assert!(keys(found).iter().all(|k| (100..=2000).contains(k)));
}

#[test]
fn test_delete_int() {
    init!();

    let list = scenario_a();
    let removed = list.delete(&1).unwrap();
    assert_eq!(removed.count(), 5);
    assert!(removed.entries().iter().all(|e| *e.key() == 1));

    assert_eq!(list.select(&1).unwrap().count(), 0, "still has key == 1");
    assert_eq!(list.count(), 5);
    assert_eq!(list.select(&2).unwrap().count(), 5);
}

#[test]
fn test_delete_range_int() {
    init!();

    let count = 10_000;
    let inserted = random_keys(count, count as i64, 5);
    let total = inserted
        .iter()
        .filter(|&&k| (100..=20_000).contains(&k))
        .count();

    let list = SkipList::new(Ascending);
    for (i, &key) in inserted.iter().enumerate() {
        list.insert(key, i).unwrap();
    }

    let removed = list.delete_range(&100, &20_000).unwrap();
    assert_eq!(removed.count(), total);

    let left = list.select_range(&100, &20_000).unwrap();
    assert_eq!(left.count(), 0, "still has nodes between 100 and 20000");
    assert_eq!(list.count(), count - total);
    assert_eq!(list.real_count(), list.count());
    assert!(keys(list.snapshot()).iter().all(|&k| k < 100));
}

#[test]
fn test_delete_range_equals_select_range() {
    init!();

    let list = SkipList::new(Ascending);
    for (i, key) in random_keys(5_000, 1_000, 6).into_iter().enumerate() {
        list.insert(key, i).unwrap();
    }

    for (lo, hi) in [(0, 10), (500, 520), (990, 2_000), (300, 300)] {
        let before = list.count();
        let selected: Vec<(i64, usize)> = list
            .select_range(&lo, &hi)
            .unwrap()
            .into_iter()
            .map(|e| (*e.key(), *e.value()))
            .collect();
        let removed: Vec<(i64, usize)> = list
            .delete_range(&lo, &hi)
            .unwrap()
            .into_iter()
            .map(|e| (*e.key(), *e.value()))
            .collect();
        assert_eq!(selected, removed, "range {}..={}", lo, hi);
        assert_eq!(list.count(), before - removed.len());
        assert!(list.select_range(&lo, &hi).unwrap().is_empty());
    }
}

#[test]
fn test_height_shrinks_to_one() {
    init!();

    let list = SkipList::new(Ascending);
    for key in 0..2_000i64 {
        list.insert(key, ()).unwrap();
    }
    assert!(list.height() > 1);
    assert!(list.height() <= list.max_height());

    let stats = list.stats();
    assert_eq!(stats.levels.len(), list.height());
    assert_eq!(stats.levels[0], 2_000);
    assert!(stats.levels.windows(2).all(|w| w[0] >= w[1]));

    list.delete_range(&0, &1_999).unwrap();
    assert_eq!(list.height(), 1);
    assert!(list.is_empty());

    list.insert(5, ()).unwrap();
    assert_eq!(list.select(&5).unwrap().count(), 1);
}

#[test]
fn test_max_height_is_respected() {
    init!();

    let config = Config {
        max_height: 3,
        probability: 0.5,
    };
    let list = SkipList::with_config(Ascending, config).unwrap();
    for key in 0..5_000i64 {
        let entry = list.insert(key, ()).unwrap();
        assert!(entry.height() <= 3);
    }
    assert!(list.height() <= 3);
}

#[test]
fn test_range_bounds_of_different_types() {
    init!();

    let list = SkipList::new(ScalarAscending);
    list.insert(Scalar::Int(1), "one").unwrap();

    let err = list
        .select_range(&Scalar::Int(0), &Scalar::Str("9".into()))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)), "{}", err);

    let err = list.select(&Scalar::Null).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)), "{}", err);

    assert_eq!(list.count(), 1);
}
