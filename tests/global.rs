use ferrous_resolver::facade::global;
use ferrous_resolver::{
    AnyArc, DefaultResolver, DelegateResolver, GetServiceFn, GetServicesFn, ResolverError,
    ResolverExt, ServiceResolver, ServiceId,
};
use serial_test::serial;
use std::sync::Arc;

#[derive(Debug)]
struct Greeting(&'static str);

fn greeting_fns(text: &'static str) -> (GetServiceFn, GetServicesFn) {
    let get_one: GetServiceFn = Arc::new(move |id: &ServiceId| {
        if *id == ServiceId::of::<Greeting>() {
            Ok(Some(Arc::new(Greeting(text)) as AnyArc))
        } else {
            Ok(None)
        }
    });
    let get_many: GetServicesFn = Arc::new(|_: &ServiceId| Ok(Vec::new()));
    (get_one, get_many)
}

#[test]
#[serial]
fn test_global_starts_with_default_behavior() {
    global::global().reset();

    assert!(global::current().get::<Greeting>().is_none());
    assert!(global::current()
        .get_service(&ServiceId::constructible::<Vec<u8>>())
        .is_some());
}

#[test]
#[serial]
fn test_global_set_resolver_fns() {
    global::global().reset();

    let (get_one, get_many) = greeting_fns("hi");
    global::set_resolver_fns(Some(get_one), Some(get_many)).unwrap();

    assert_eq!(global::current().get::<Greeting>().unwrap().0, "hi");
    assert_eq!(global::current_cache().get::<Greeting>().unwrap().0, "hi");
}

#[test]
#[serial]
fn test_global_rejects_missing_arguments() {
    global::global().reset();
    let before = global::global().generation_number();

    let (_, get_many) = greeting_fns("unused");
    match global::set_resolver_fns(None, Some(get_many)) {
        Err(ResolverError::MissingArgument(name)) => assert_eq!(name, "get_service"),
        other => panic!("unexpected: {:?}", other),
    }
    assert!(global::set_resolver(None).is_err());
    assert!(global::set_dynamic_locator(None).is_err());

    assert_eq!(global::global().generation_number(), before);
}

#[test]
#[serial]
fn test_global_swap_replaces_cache() {
    global::global().reset();

    let (get_one, get_many) = greeting_fns("first");
    global::set_resolver(Some(Arc::new(DelegateResolver::from_arcs(get_one, get_many)))).unwrap();
    let first = global::current_cache().get::<Greeting>().unwrap();

    let (get_one, get_many) = greeting_fns("second");
    global::set_resolver(Some(Arc::new(DelegateResolver::from_arcs(get_one, get_many)))).unwrap();
    let second = global::current_cache().get::<Greeting>().unwrap();

    assert_eq!(first.0, "first");
    assert_eq!(second.0, "second");
}

#[test]
#[serial]
fn test_global_accepts_explicit_default() {
    let (get_one, get_many) = greeting_fns("temporary");
    global::set_resolver_fns(Some(get_one), Some(get_many)).unwrap();

    global::set_resolver(Some(Arc::new(DefaultResolver::new()))).unwrap();
    assert!(global::current().get::<Greeting>().is_none());
}
