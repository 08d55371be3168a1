use std::sync::Arc;

use autowire::{locator, Alias, Autowire, Container, RegisterError, TypeCatalog};

#[derive(Autowire)]
struct Mailer;

#[derive(Autowire)]
struct Signup {
    mailer: Arc<Mailer>,
}

// Single test so installation order is deterministic within this process
#[test]
fn locator_delegates_to_installed_container() {
    let installed = locator::install(Container::new(
        TypeCatalog::new().with::<Mailer>().with::<Signup>(),
    ))
    .unwrap();
    assert!(std::ptr::eq(installed, locator::global()));

    let rejected = locator::install(Container::new(TypeCatalog::new()));
    assert!(rejected.is_err());

    // Auto-wiring through the facade
    let signup = locator::resolve::<Signup>().unwrap();
    let mailer = locator::resolve::<Mailer>().unwrap();
    assert!(Arc::ptr_eq(&signup.mailer, &mailer));
    assert!(locator::is_registered(Alias::of::<Signup>()));

    // Registration through the facade is visible on the container
    locator::register("greeting", || Arc::new(String::from("hello"))).unwrap();
    assert!(installed.is_registered("greeting"));
    assert!(matches!(
        locator::register("greeting", || Arc::new(String::new())),
        Err(RegisterError::Duplicate(_))
    ));

    let greeting = locator::make("greeting").unwrap();
    assert_eq!(*greeting.downcast::<String>().unwrap(), "hello");

    locator::forget("greeting").forget(Alias::of::<Mailer>());
    assert!(!locator::is_registered("greeting"));

    let rebuilt = locator::resolve::<Mailer>().unwrap();
    assert!(!Arc::ptr_eq(&rebuilt, &mailer));
}
