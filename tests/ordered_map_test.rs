//! Order-preserving map behavior under growth, removal, and random churn.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rowcore::{OrderedMap, Value, ValueMap};

#[test]
fn test_insertion_order_survives_growth() {
    let mut map: OrderedMap<usize> = OrderedMap::new();
    for i in 0..500 {
        map.put(&format!("field_{i}"), i);
    }
    assert_eq!(map.len(), 500);
    for i in 0..500 {
        assert_eq!(map.key_at(i), format!("field_{i}"));
        assert_eq!(map.value_at(i), &i);
        assert_eq!(map.index_of(&format!("field_{i}")), Some(i));
    }
}

#[test]
fn test_overwrite_keeps_ordinal() {
    let mut map: OrderedMap<i64> = OrderedMap::new();
    map.put("a", 1);
    map.put("b", 2);
    map.put("c", 3);
    assert_eq!(map.put("b", 20), Some(2));
    assert_eq!(map.index_of("b"), Some(1));
    assert_eq!(map.len(), 3);
    let keys: Vec<&str> = map.keys().collect();
    assert_eq!(keys, vec!["a", "b", "c"]);
}

#[test]
fn test_remove_shifts_later_ordinals() {
    let mut map: OrderedMap<i64> = OrderedMap::new();
    for (i, key) in ["w", "x", "y", "z"].iter().enumerate() {
        map.put(key, i as i64);
    }
    assert_eq!(map.remove("x"), Some(1));
    assert_eq!(map.index_of("w"), Some(0));
    assert_eq!(map.index_of("y"), Some(1));
    assert_eq!(map.index_of("z"), Some(2));
    assert_eq!(map.remove_at(0), 0);
    let keys: Vec<&str> = map.keys().collect();
    assert_eq!(keys, vec!["y", "z"]);
}

#[test]
fn test_random_churn_matches_vec_model() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut map: OrderedMap<i64> = OrderedMap::new();
    let mut model: Vec<(String, i64)> = Vec::new();

    for step in 0..5_000i64 {
        let key = format!("k{}", rng.gen_range(0..400));
        if rng.gen_bool(0.6) {
            let prior = map.put(&key, step);
            match model.iter().position(|(k, _)| *k == key) {
                Some(i) => {
                    assert_eq!(prior, Some(model[i].1));
                    model[i].1 = step;
                }
                None => {
                    assert_eq!(prior, None);
                    model.push((key.clone(), step));
                }
            }
        } else {
            let removed = map.remove(&key);
            match model.iter().position(|(k, _)| *k == key) {
                Some(i) => assert_eq!(removed, Some(model.remove(i).1)),
                None => assert_eq!(removed, None),
            }
        }

        if step % 500 == 0 {
            assert_eq!(map.len(), model.len());
            for (i, (k, v)) in model.iter().enumerate() {
                assert_eq!(map.key_at(i), k.as_str());
                assert_eq!(map.value_at(i), v);
                assert_eq!(map.index_of(k), Some(i));
            }
        }
    }

    let seen: Vec<(String, i64)> = map.iter().map(|(k, v)| (k.to_string(), *v)).collect();
    assert_eq!(seen, model);
}

// Every put/remove pair leaves a tombstone behind; the table must keep
// reclaiming them instead of filling up.
#[test]
fn test_tombstone_churn_on_single_key() {
    let mut map: OrderedMap<i64> = OrderedMap::new();
    for i in 0..10_000 {
        map.put("hot", i);
        assert_eq!(map.remove("hot"), Some(i));
    }
    assert!(map.is_empty());
    map.put("hot", -1);
    assert_eq!(map.get("hot"), Some(&-1));
    assert_eq!(map.len(), 1);
}

#[test]
fn test_clear_then_reuse() {
    let mut map: OrderedMap<String> = OrderedMap::new();
    for i in 0..100 {
        map.put(&format!("k{i}"), format!("v{i}"));
    }
    map.clear();
    assert!(map.is_empty());
    assert_eq!(map.get("k42"), None);
    map.put("fresh", "start".to_string());
    assert_eq!(map.index_of("fresh"), Some(0));
}

#[test]
fn test_value_map_mixed_tags() {
    let mut map = ValueMap::new();
    map.put("count", Value::Long(12));
    map.put("price", Value::Double(9.75));
    map.put("label", Value::String("widget".to_string()));
    map.put("live", Value::Boolean(true));

    assert_eq!(map.get("price"), Some(&Value::Double(9.75)));
    if let Some(Value::Long(n)) = map.get_mut("count") {
        *n += 1;
    }
    assert_eq!(map.get("count"), Some(&Value::Long(13)));

    let names: Vec<&str> = map.keys().collect();
    assert_eq!(names, vec!["count", "price", "label", "live"]);
}

#[test]
fn test_set_value_at_swaps_in_place() {
    let mut map: OrderedMap<i64> = OrderedMap::new();
    map.put("a", 1);
    map.put("b", 2);
    let old = map.set_value_at(1, 200);
    assert_eq!(old, 2);
    assert_eq!(map.get("b"), Some(&200));
    assert_eq!(map.index_of("b"), Some(1));
}
