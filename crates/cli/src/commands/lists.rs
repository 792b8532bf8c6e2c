//! Wishlist, comparison and recently-viewed commands.

use teahouse_client::Session;
use teahouse_core::store::AddOutcome;
use teahouse_core::types::ProductId;

/// One list operation from the command line.
pub enum ListOp {
    Add(ProductId),
    Remove(ProductId),
    Toggle(ProductId),
    Clear,
    Show,
}

fn show_ids(label: &str, ids: &[ProductId]) {
    if ids.is_empty() {
        tracing::info!("{label} is empty");
        return;
    }
    let ids: Vec<String> = ids.iter().map(ToString::to_string).collect();
    tracing::info!("{label}: {}", ids.join(", "));
}

pub fn wishlist(session: &mut Session, op: ListOp) {
    let wishlist = session.shop.wishlist_mut();
    match op {
        ListOp::Add(id) => {
            if wishlist.add_item(id) == AddOutcome::AlreadyPresent {
                tracing::info!("Product {id} is already in the wishlist");
            }
        }
        ListOp::Remove(id) => {
            wishlist.remove_item(id);
        }
        ListOp::Toggle(id) => {
            let present = wishlist.toggle(id);
            tracing::info!(
                "Product {id} {} the wishlist",
                if present { "is now in" } else { "was removed from" }
            );
        }
        ListOp::Clear => wishlist.clear(),
        ListOp::Show => show_ids("Wishlist", &wishlist.ids()),
    }
}

pub fn comparison(session: &mut Session, op: ListOp) -> Result<(), String> {
    let comparison = session.shop.comparison_mut();
    match op {
        ListOp::Add(id) => {
            comparison.add_item(id);
        }
        ListOp::Remove(id) => {
            comparison.remove_item(id);
        }
        ListOp::Toggle(_) => return Err("toggle is only supported for the wishlist".to_string()),
        ListOp::Clear => comparison.clear(),
        ListOp::Show => show_ids("Comparison", &comparison.ids()),
    }
    Ok(())
}

pub fn viewed(session: &mut Session, op: ListOp) -> Result<(), String> {
    match op {
        ListOp::Add(id) => session.shop.view_product(id),
        ListOp::Remove(id) => {
            session.shop.recently_viewed_mut().remove_item(id);
        }
        ListOp::Toggle(_) => return Err("toggle is only supported for the wishlist".to_string()),
        ListOp::Clear => session.shop.recently_viewed_mut().clear(),
        ListOp::Show => show_ids(
            "Recently viewed",
            &session.shop.recently_viewed().recent_first(),
        ),
    }
    Ok(())
}
