//! Demo run: one customer orders, the kitchen shows the order, ticks it off and purges.

use chrono::Utc;
use eiscafe::kitchen::orders_label;
use eiscafe::lifecycle::{setup_tracing, CafeConfig, CafeSystem};
use eiscafe::model::{CoffeeExtra, CoffeeType, Flavor, COFFEE_DRINK};
use std::time::Duration;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    let config = CafeConfig::from_env().map_err(|e| e.to_string())?;
    setup_tracing(&config.log_filter);

    info!("Starting cafe");
    let system = CafeSystem::start(&config);

    // Customer side
    let form = system.order_form();
    form.edit(|draft| {
        draft.set_customer_name("Mia");
        draft.adjust_scoops(Flavor::Chocolate, 2);
        draft.adjust_scoops(Flavor::Stracciatella, 1);
        draft.toggle_topping("Sahne");
        draft.toggle_drink(COFFEE_DRINK);
        draft.select_coffee_type(CoffeeType::Cappuccino);
        draft.toggle_coffee_extra(CoffeeExtra::Sugar);
        draft.set_remarks("Im Becher, bitte");
    });

    let span = tracing::info_span!("order_form");
    let submitted = async { form.submit().await }.instrument(span).await;
    match &submitted {
        Ok(order_id) => info!(order_id = %order_id, "Order placed"),
        Err(e) => error!(error = %e, "Order not placed"),
    }
    if let Some(phase) = form.confirmation() {
        info!(message = phase.message(), "Confirmation");
    }

    // Kitchen side
    let mut kitchen = system.kitchen_view();
    kitchen.mount();
    tokio::time::sleep(Duration::from_millis(200)).await;

    let cards = kitchen.cards(Utc::now());
    info!(header = %orders_label(cards.len()), "Kitchen board");
    for card in &cards {
        info!(
            order_id = %card.id,
            customer = %card.customer_name,
            placed_at = %card.placed_at,
            elapsed = %card.elapsed,
            ice_cream = ?card.ice_cream,
            toppings = ?card.toppings,
            drinks = ?card.drinks,
            remarks = ?card.remarks,
            "Order card"
        );
    }

    if let Some(card) = cards.first() {
        if let Err(e) = kitchen.delete(&card.id).await {
            error!(error = %e, "Could not tick off order");
        }
    }
    if let Err(e) = kitchen.cleanup().await {
        error!(error = %e, "Cleanup failed");
    }
    info!(header = %orders_label(kitchen.orders().len()), "Kitchen board");

    kitchen.unmount().await;
    drop(kitchen);
    drop(form);
    system.shutdown().await?;

    info!("Cafe closed");
    Ok(())
}
