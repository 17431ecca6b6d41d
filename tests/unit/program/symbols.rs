use super::*;

#[test]
fn declare_is_idempotent_per_kind() {
    let mut store = SymbolStore::new();
    let a = store.declare("spin", SymbolValue::Value(0.0)).unwrap();
    store.set(a, 3.5).unwrap();
    let b = store.declare("spin", SymbolValue::Value(0.0)).unwrap();
    assert_eq!(a, b);
    assert_eq!(store.get(a).unwrap(), 3.5);
    assert_eq!(store.len(), 1);
}

#[test]
fn declare_with_other_kind_is_rejected() {
    let mut store = SymbolStore::new();
    store.declare("spin", SymbolValue::Value(0.0)).unwrap();
    let err = store
        .declare("spin", SymbolValue::CoordSystem(None))
        .unwrap_err();
    assert!(matches!(
        err,
        MdlError::SymbolKind {
            expected: "coordinate system",
            found: "value",
            ..
        }
    ));
}

#[test]
fn lookup_missing_name_is_not_found() {
    let store = SymbolStore::new();
    assert!(matches!(store.lookup("ghost"), Err(MdlError::NotFound(_))));
}

#[test]
fn foreign_handle_is_not_found() {
    let mut big = SymbolStore::new();
    big.declare("a", SymbolValue::Value(0.0)).unwrap();
    let b = big.declare("b", SymbolValue::Value(0.0)).unwrap();

    let mut small = SymbolStore::new();
    small.declare("a", SymbolValue::Value(0.0)).unwrap();
    assert!(matches!(small.get(b), Err(MdlError::NotFound(_))));
}

#[test]
fn set_all_values_only_touches_value_symbols() {
    let mut store = SymbolStore::new();
    let a = store.declare("a", SymbolValue::Value(1.0)).unwrap();
    let cs = store.declare("world", SymbolValue::CoordSystem(None)).unwrap();
    let shiny = store
        .declare("shiny", SymbolValue::Constants(Rgba8::opaque(200, 10, 10)))
        .unwrap();
    let b = store.declare("b", SymbolValue::Value(2.0)).unwrap();

    store.set_all_values(7.0);

    assert_eq!(store.get(a).unwrap(), 7.0);
    assert_eq!(store.get(b).unwrap(), 7.0);
    assert_eq!(store.constants(shiny).unwrap(), Rgba8::opaque(200, 10, 10));
    assert_eq!(store.value_refs().collect::<Vec<_>>(), vec![a, b]);
    assert!(store.coord_system(cs).is_err());
}

#[test]
fn coord_system_must_be_saved_before_use() {
    let mut store = SymbolStore::new();
    let cs = store.declare("arm", SymbolValue::CoordSystem(None)).unwrap();
    assert!(matches!(store.coord_system(cs), Err(MdlError::NotFound(_))));

    let m = DMat4::from_translation(glam::DVec3::new(1.0, 2.0, 3.0));
    store.save_coord_system(cs, m).unwrap();
    assert_eq!(store.coord_system(cs).unwrap(), m);
}

#[test]
fn value_accessors_reject_other_kinds() {
    let mut store = SymbolStore::new();
    let cs = store.declare("arm", SymbolValue::CoordSystem(None)).unwrap();
    assert!(matches!(store.get(cs), Err(MdlError::SymbolKind { .. })));
    assert!(matches!(store.set(cs, 1.0), Err(MdlError::SymbolKind { .. })));
}

#[test]
fn knob_report_lists_values_in_declaration_order() {
    let mut store = SymbolStore::new();
    store.declare("zeta", SymbolValue::Value(1.0)).unwrap();
    store.declare("arm", SymbolValue::CoordSystem(None)).unwrap();
    store.declare("alpha", SymbolValue::Value(2.0)).unwrap();
    assert_eq!(
        store.knob_report(),
        vec![("zeta".to_string(), 1.0), ("alpha".to_string(), 2.0)]
    );
}
