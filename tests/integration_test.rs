use chrono::Utc;
use eiscafe::kitchen::{orders_label, KitchenSettings};
use eiscafe::lifecycle::{CafeConfig, CafeSystem, StoreBackend};
use eiscafe::model::{CoffeeExtra, CoffeeType, Flavor, COFFEE_DRINK};
use eiscafe::order_form::{ConfirmationTimings, SubmitError};
use std::time::Duration;

/// Full flow against the in-memory store: two tablets order, the kitchen shows
/// both orders newest first, ticks one off, and the system shuts down cleanly.
#[tokio::test]
async fn test_full_cafe_flow() {
    let system = CafeSystem::start(&CafeConfig::default());
    assert!(system.has_store());

    let tablet_a = system.order_form();
    let tablet_b = system.order_form();

    tablet_a.edit(|d| {
        d.set_customer_name("Mia");
        d.adjust_scoops(Flavor::Chocolate, 2);
        d.adjust_scoops(Flavor::Stracciatella, 1);
        d.toggle_topping("Bunte Streusel");
    });
    let first = tablet_a.submit().await.expect("first order");

    // Keep the two timestamps apart
    tokio::time::sleep(Duration::from_millis(5)).await;

    tablet_b.edit(|d| {
        d.set_customer_name("Jonas");
        d.toggle_drinks_only();
        d.toggle_drink(COFFEE_DRINK);
        d.select_coffee_type(CoffeeType::Espresso);
        d.toggle_coffee_extra(CoffeeExtra::Sugar);
        d.set_remarks("schnell bitte");
    });
    let second = tablet_b.submit().await.expect("second order");
    assert_ne!(first, second);

    let view = system.kitchen_view();
    assert_eq!(view.refresh().await, Ok(2));

    let cards = view.cards(Utc::now());
    assert_eq!(orders_label(cards.len()), "2 orders");

    // Newest first
    assert_eq!(cards[0].id, second);
    assert_eq!(cards[0].customer_name, "Jonas");
    assert!(cards[0].drinks_only);
    assert!(!cards[0].shows_ice_cream());
    assert_eq!(cards[0].drinks, vec!["Espresso (mit Zucker)".to_string()]);
    assert_eq!(cards[0].remarks.as_deref(), Some("schnell bitte"));
    assert_eq!(cards[0].elapsed, "just now");

    assert_eq!(cards[1].id, first);
    assert_eq!(
        cards[1].ice_cream,
        vec!["2x Schokolade".to_string(), "1x Stracciatella".to_string()]
    );
    assert_eq!(cards[1].toppings, vec!["Bunte Streusel".to_string()]);
    assert_eq!(cards[1].remarks, None);

    // Tick off the first order; a second kitchen screen sees it gone too
    view.delete(&first).await.unwrap();
    assert_eq!(view.orders().len(), 1);

    let other_screen = system.kitchen_view();
    other_screen.refresh().await.unwrap();
    assert_eq!(other_screen.orders()[0].id, second);

    // Deleting it again is harmless
    view.delete(&first).await.unwrap();

    // Nothing here is old enough to purge
    view.cleanup().await.unwrap();
    assert_eq!(view.refresh().await, Ok(1));

    drop(view);
    drop(other_screen);
    drop(tablet_a);
    drop(tablet_b);
    system.shutdown().await.unwrap();
}

/// A mounted kitchen picks up new orders on its own.
#[tokio::test]
async fn test_mounted_kitchen_sees_new_orders() {
    let config = CafeConfig {
        kitchen: KitchenSettings {
            refresh_interval_ms: 20,
            ..KitchenSettings::default()
        },
        ..CafeConfig::default()
    };
    let system = CafeSystem::start(&config);

    let mut kitchen = system.kitchen_view();
    kitchen.mount();

    let form = system.order_form();
    form.edit(|d| {
        d.set_customer_name("Ali");
        d.adjust_scoops(Flavor::Vanilla, 1);
    });
    let id = form.submit().await.unwrap();

    let mut seen = false;
    for _ in 0..50 {
        tokio::time::sleep(Duration::from_millis(20)).await;
        if kitchen.orders().iter().any(|o| o.id == id) {
            seen = true;
            break;
        }
    }
    assert!(seen, "kitchen never showed the new order");

    kitchen.unmount().await;
    drop(kitchen);
    drop(form);
    system.shutdown().await.unwrap();
}

/// A hosted backend without credentials starts, but nothing can be submitted.
#[tokio::test]
async fn test_rest_backend_without_credentials() {
    let mut config = CafeConfig::default();
    config.store.backend = StoreBackend::Rest;

    let system = CafeSystem::start(&config);
    assert!(!system.has_store());

    let form = system.order_form();
    form.edit(|d| {
        d.set_customer_name("Mia");
        d.adjust_scoops(Flavor::Vanilla, 1);
    });
    assert_eq!(form.submit().await, Err(SubmitError::StoreUnavailable));

    let view = system.kitchen_view();
    assert!(view.refresh().await.is_err());
    assert!(view.orders().is_empty());

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_shutdown_with_custom_store() {
    let mock = eiscafe::store::mock::MockDatastore::new();
    let store: std::sync::Arc<dyn eiscafe::store::Datastore> = std::sync::Arc::new(mock.clone());
    let system = CafeSystem::with_store(
        Some(store),
        KitchenSettings::default(),
        ConfirmationTimings::default(),
    );

    assert!(system.has_store());
    system.shutdown().await.unwrap();
    mock.verify();
}
