//! Property-based tests for registry writes

#![allow(clippy::unwrap_used)]

use gestures_events::PropValue;
use gestures_props::prelude::*;
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_short_accepts_in_range_ints(v in i32::from(i16::MIN)..=i32::from(i16::MAX)) {
        let reg = PropRegistry::new();
        let p = reg.register_short("S", 0).unwrap();
        reg.set("S", PropValue::Int(v)).unwrap();
        prop_assert_eq!(i32::from(p.get()), v);
    }

    #[test]
    fn prop_short_rejects_out_of_range_ints(v in prop_oneof![i32::MIN..i32::from(i16::MIN), (i32::from(i16::MAX) + 1)..i32::MAX]) {
        let reg = PropRegistry::new();
        let p = reg.register_short("S", 3).unwrap();
        prop_assert!(reg.set("S", PropValue::Int(v)).is_err());
        prop_assert_eq!(p.get(), 3);
    }

    #[test]
    fn prop_snapshot_restores_into_fresh_registry(a in any::<i32>(), d in -1.0e6f64..1.0e6, b in any::<bool>()) {
        let reg = PropRegistry::new();
        reg.register_int("A", a).unwrap();
        reg.register_double("D", d).unwrap();
        reg.register_bool("B", b).unwrap();

        let fresh = PropRegistry::new();
        let ai = fresh.register_int("A", 0).unwrap();
        let dd = fresh.register_double("D", 0.0).unwrap();
        let bb = fresh.register_bool("B", !b).unwrap();
        for (name, value) in reg.snapshot() {
            fresh.restore_json(&name, &value).unwrap();
        }
        prop_assert_eq!(ai.get(), a);
        prop_assert!((dd.get() - d).abs() <= f64::EPSILON * d.abs().max(1.0));
        prop_assert_eq!(bb.get(), b);
    }
}
