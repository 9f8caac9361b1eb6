//! Plain-text rendering of command results.

use std::io::{self, Write};

use threadline_admin::CatalogQuestion;
use threadline_core::{Banner, CartStore, OrderRecord, OrderSummary, Product, ProductQuestion};
use threadline_storefront::api::OrderConfirmation;

pub fn products(out: &mut impl Write, products: &[&Product]) -> io::Result<()> {
    if products.is_empty() {
        return writeln!(out, "No products found");
    }
    for product in products {
        let category = product.category.map_or("-", |c| c.as_str());
        let featured = if product.is_featured { " *" } else { "" };
        writeln!(
            out,
            "{:<26} {:<32} {:<6} {:>14}{featured}",
            product.id,
            product.name,
            category,
            product.price.display()
        )?;
    }
    Ok(())
}

pub fn product_detail(out: &mut impl Write, product: &Product) -> io::Result<()> {
    writeln!(out, "{} ({})", product.name, product.id)?;
    writeln!(out, "Price:    {}", product.price.display())?;
    if let Some(category) = product.category {
        writeln!(out, "Category: {category}")?;
    }
    if !product.sizes.is_empty() {
        writeln!(out, "Sizes:    {}", product.sizes.join(", "))?;
    }
    let colors = product.available_colors();
    if !colors.is_empty() {
        writeln!(out, "Colours:  {}", colors.join(", "))?;
    }
    if !product.description.is_empty() {
        writeln!(out, "\n{}", product.description)?;
    }
    Ok(())
}

pub fn cart(out: &mut impl Write, cart: &CartStore, summary: &OrderSummary) -> io::Result<()> {
    if cart.is_empty() {
        return writeln!(out, "Your cart is empty");
    }
    for item in cart.items() {
        let color = item.color.as_deref().map(|c| format!(" / {c}")).unwrap_or_default();
        writeln!(
            out,
            "{:<32} {:>4}{color:<10} {:>14}",
            item.name,
            item.size,
            item.price.display()
        )?;
    }
    summary_lines(out, summary)
}

pub fn order_placed(
    out: &mut impl Write,
    confirmation: &OrderConfirmation,
    summary: &OrderSummary,
) -> io::Result<()> {
    writeln!(
        out,
        "{}",
        confirmation.message.as_deref().unwrap_or("Order placed successfully")
    )?;
    if let Some(id) = confirmation.order_id() {
        writeln!(out, "Order id: {id}")?;
    }
    summary_lines(out, summary)?;
    writeln!(out, "Payment: Cash on Delivery")
}

fn summary_lines(out: &mut impl Write, summary: &OrderSummary) -> io::Result<()> {
    writeln!(out, "{:<48} {:>14}", "Subtotal", summary.subtotal.display())?;
    writeln!(out, "{:<48} {:>14}", "Shipping", summary.shipping.display())?;
    writeln!(out, "{:<48} {:>14}", "Total", summary.total.display())
}

pub fn questions(out: &mut impl Write, threads: &[ProductQuestion]) -> io::Result<()> {
    if threads.is_empty() {
        return writeln!(out, "No questions yet");
    }
    for thread in threads {
        thread_lines(out, thread)?;
    }
    Ok(())
}

pub fn catalog_questions(out: &mut impl Write, questions: &[&CatalogQuestion]) -> io::Result<()> {
    if questions.is_empty() {
        return writeln!(out, "No questions found");
    }
    for question in questions {
        writeln!(out, "[{}] {}", question.product_id, question.product_name)?;
        thread_lines(out, &question.thread)?;
    }
    Ok(())
}

fn thread_lines(out: &mut impl Write, thread: &ProductQuestion) -> io::Result<()> {
    let question = &thread.question;
    writeln!(
        out,
        "Q {} - {} ({}, {})",
        thread.id,
        question.text,
        question.asked_by,
        question.created_at.format("%Y-%m-%d")
    )?;
    for answer in &thread.answers {
        let badge = if answer.is_admin { " [official]" } else { "" };
        writeln!(
            out,
            "  A {} - {} ({}{badge})",
            answer.id, answer.text, answer.answered_by
        )?;
    }
    Ok(())
}

pub fn banners(out: &mut impl Write, banners: &[Banner]) -> io::Result<()> {
    if banners.is_empty() {
        return writeln!(out, "No banners");
    }
    for banner in banners {
        writeln!(out, "{:<26} {}", banner.id, banner.image_url)?;
    }
    Ok(())
}

pub fn orders(out: &mut impl Write, orders: &[&OrderRecord]) -> io::Result<()> {
    if orders.is_empty() {
        return writeln!(out, "No orders found");
    }
    for order in orders {
        writeln!(
            out,
            "{:<26} {} {:<28} {:<10} {:>14}",
            order.id,
            order.created_at.format("%Y-%m-%d"),
            order.customer_name(),
            order.status,
            order.total_amount.display()
        )?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use threadline_core::{CartItem, Price, ProductId};

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_empty_cart() {
        let cart = CartStore::new();
        let text = render(|out| cart_view(out, &cart));
        assert_eq!(text, "Your cart is empty\n");
    }

    fn cart_view(out: &mut Vec<u8>, cart_store: &CartStore) -> io::Result<()> {
        cart(out, cart_store, &OrderSummary::for_cart(cart_store))
    }

    #[test]
    fn test_cart_totals_include_shipping() {
        let mut store = CartStore::new();
        store
            .add(
                CartItem::new(ProductId::new("p1"), "Lawn Suit", Price::from_units(4500), "M")
                    .with_color("Mint"),
            )
            .unwrap();
        let text = render(|out| cart_view(out, &store));
        assert!(text.contains("Lawn Suit"));
        assert!(text.contains("M / Mint"));
        assert!(text.contains("PKR 4,500.00"));
        assert!(text.contains("PKR 150.00"));
        assert!(text.contains("PKR 4,650.00"));
    }

    #[test]
    fn test_order_confirmation() {
        let confirmation: OrderConfirmation =
            serde_json::from_str(r#"{"message":"Order created","order":{"_id":"o-9"}}"#).unwrap();
        let summary = OrderSummary::for_cart(&CartStore::new());
        let text = render(|out| order_placed(out, &confirmation, &summary));
        assert!(text.starts_with("Order created\nOrder id: o-9\n"));
        assert!(text.ends_with("Payment: Cash on Delivery\n"));
    }
}
