use assert_matches::assert_matches;
use eiscafe::model::{
    CoffeeExtra, CoffeeType, Flavor, FlavorPortion, OrderDraft, COFFEE_DRINK,
};
use eiscafe::order_form::{ConfirmationPhase, ConfirmationTimings, OrderForm, SubmitError};
use eiscafe::store::mock::{Call, MockDatastore};
use eiscafe::store::{Datastore, StoreError};
use std::sync::Arc;
use std::time::Duration;

fn form_with(mock: &MockDatastore) -> OrderForm {
    let store: Arc<dyn Datastore> = Arc::new(mock.clone());
    OrderForm::new(Some(store), ConfirmationTimings::default())
}

/// Validation failures never reach the datastore.
///
/// The mock has no expectations, so any insert would panic.
#[tokio::test]
async fn test_validation_never_inserts() {
    let mock = MockDatastore::new();
    let form = form_with(&mock);

    // Blank name wins over everything else
    form.edit(|d| d.set_customer_name("   "));
    assert_eq!(form.submit().await, Err(SubmitError::NameRequired));

    // Ice cream order without scoops
    form.edit(|d| d.set_customer_name("Jonas"));
    assert_eq!(form.submit().await, Err(SubmitError::NoScoops));

    // Drinks-only order without drinks
    form.edit(|d| d.toggle_drinks_only());
    assert_eq!(form.submit().await, Err(SubmitError::NoDrinks));

    assert!(mock.calls().is_empty());
    assert!(!form.is_submitting());
    assert_eq!(form.confirmation(), None);
}

#[tokio::test]
async fn test_missing_store_is_reported_after_name_check() {
    let form = OrderForm::new(None, ConfirmationTimings::default());

    assert_eq!(form.submit().await, Err(SubmitError::NameRequired));

    form.edit(|d| {
        d.set_customer_name("Jonas");
        d.adjust_scoops(Flavor::Vanilla, 1);
    });
    assert_eq!(form.submit().await, Err(SubmitError::StoreUnavailable));

    // Nothing was lost
    assert_eq!(form.draft().scoops(Flavor::Vanilla), 1);
}

/// A successful submit sends exactly the draft, resets it, and walks through
/// both confirmation phases.
#[tokio::test(start_paused = true)]
async fn test_successful_submit_resets_and_confirms() {
    let mock = MockDatastore::new();
    mock.expect_insert().return_ok("order_1");
    let form = form_with(&mock);

    form.edit(|d| {
        d.set_customer_name("Mia");
        d.adjust_scoops(Flavor::Chocolate, 2);
        d.adjust_scoops(Flavor::Stracciatella, 1);
        d.toggle_topping("Sahne");
        d.toggle_drink(COFFEE_DRINK);
        d.select_coffee_type(CoffeeType::Cappuccino);
        d.toggle_coffee_extra(CoffeeExtra::Milk);
        d.set_remarks("ohne Löffel");
    });

    let id = form.submit().await.expect("submit should succeed");
    assert_eq!(id.to_string(), "order_1");

    let sent = mock.inserted();
    assert_eq!(sent.len(), 1);
    let order = &sent[0];
    assert_eq!(order.customer_name, "Mia");
    assert_eq!(
        order.flavors,
        vec![
            FlavorPortion::new("Schokolade", 2),
            FlavorPortion::new("Stracciatella", 1)
        ]
    );
    assert_eq!(order.toppings, vec!["Sahne".to_string()]);
    assert_eq!(order.drinks, vec!["Kaffee".to_string()]);
    assert_eq!(order.coffee_type.as_deref(), Some("Cappuccino (mit Milch)"));
    assert_eq!(order.remarks, "ohne Löffel");
    assert!(!order.drinks_only);

    // Form is back to a fresh draft
    assert_eq!(form.draft(), OrderDraft::default());
    assert!(!form.is_submitting());

    // Confirmation: "sent" for 2s, "thank you" for 3s more, then gone
    assert_eq!(form.confirmation(), Some(ConfirmationPhase::Sent));
    tokio::time::advance(Duration::from_millis(1_999)).await;
    assert_eq!(form.confirmation(), Some(ConfirmationPhase::Sent));
    tokio::time::advance(Duration::from_millis(1)).await;
    assert_eq!(form.confirmation(), Some(ConfirmationPhase::ThankYou));
    tokio::time::advance(Duration::from_millis(3_000)).await;
    assert_eq!(form.confirmation(), None);

    mock.verify();
}

#[tokio::test]
async fn test_drinks_only_submit() {
    let mock = MockDatastore::new();
    mock.expect_insert().return_ok("order_7");
    let form = form_with(&mock);

    form.edit(|d| {
        d.set_customer_name("Ali");
        d.adjust_scoops(Flavor::Vanilla, 3);
        d.toggle_topping("Waffeln");
        d.toggle_drinks_only();
        d.toggle_drink("Cola");
    });

    assert!(form.submit().await.is_ok());

    let order = &mock.inserted()[0];
    assert!(order.drinks_only);
    assert!(order.flavors.is_empty());
    assert!(order.toppings.is_empty());
    assert_eq!(order.drinks, vec!["Cola".to_string()]);
    assert_eq!(order.coffee_type, None);
    mock.verify();
}

/// A rejected insert keeps the draft so the customer can retry.
#[tokio::test]
async fn test_store_failure_keeps_draft() {
    let mock = MockDatastore::new();
    mock.expect_insert()
        .return_err(StoreError::Request("connection refused".to_string()));
    mock.expect_insert().return_ok("order_2");
    let form = form_with(&mock);

    form.edit(|d| {
        d.set_customer_name("Lena");
        d.adjust_scoops(Flavor::Vanilla, 2);
    });
    let before = form.draft();

    let err = form.submit().await.unwrap_err();
    assert_matches!(&err, SubmitError::Store(StoreError::Request(_)));
    assert!(!err.is_validation());
    assert_eq!(form.draft(), before);
    assert!(!form.is_submitting());
    assert_eq!(form.confirmation(), None);

    // Retry goes through
    assert!(form.submit().await.is_ok());
    assert_eq!(mock.inserted().len(), 2);
    mock.verify();
}

/// While one submit is waiting on the datastore, a second one is refused locally.
#[tokio::test(start_paused = true)]
async fn test_second_submit_while_in_flight_is_refused() {
    let mock = MockDatastore::new();
    mock.expect_insert()
        .after(Duration::from_secs(1))
        .return_ok("order_1");
    let form = form_with(&mock);

    form.edit(|d| {
        d.set_customer_name("Mia");
        d.adjust_scoops(Flavor::Chocolate, 1);
    });

    let first = {
        let form = form.clone();
        tokio::spawn(async move { form.submit().await })
    };

    // Let the first submit reach the datastore
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(form.is_submitting());

    assert_eq!(form.submit().await, Err(SubmitError::InFlight));

    let id = first.await.unwrap().unwrap();
    assert_eq!(id.to_string(), "order_1");
    assert!(!form.is_submitting());

    assert_eq!(mock.calls().len(), 1);
    assert_matches!(&mock.calls()[0], Call::Insert(_));
    mock.verify();
}

/// Abandoning a submit mid-flight releases the guard.
#[tokio::test(start_paused = true)]
async fn test_dropped_submit_releases_guard() {
    let mock = MockDatastore::new();
    mock.expect_insert()
        .after(Duration::from_secs(5))
        .return_ok("order_1");
    let form = form_with(&mock);

    form.edit(|d| {
        d.set_customer_name("Mia");
        d.adjust_scoops(Flavor::Chocolate, 1);
    });

    let result = tokio::time::timeout(Duration::from_millis(100), form.submit()).await;
    assert!(result.is_err());

    assert!(!form.is_submitting());
    // Nothing confirmed, nothing reset
    assert_eq!(form.draft().scoops(Flavor::Chocolate), 1);
    assert_eq!(form.confirmation(), None);
}
