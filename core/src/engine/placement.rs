// stockline/src/engine/placement.rs

use tracing::{debug, info, instrument, warn};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::{quantities_by_variant, settle, OrderEngine};
use crate::catalog::lookup_variant;
use crate::error::{OrderError, OrderResult};
use crate::model::{Customer, CustomerId, NewOrder, NewOrderItem, OrderRequest, OrderWithItems, VariantId, VariantView};
use crate::notify::OrderEvent;
use crate::pricing::{subtotal, PricedLine};
use crate::store::OrderTransaction;

impl OrderEngine {
  /// Places an order as one unit of work: every line is validated against a fresh read,
  /// stock is decremented relatively, prices are snapshotted, and the order with its
  /// items is persisted. Any failure leaves stock and orders exactly as they were.
  ///
  /// Lines for the same variant draw on its stock together, and variants are reserved in
  /// ascending id order; items keep the cart's order.
  ///
  /// Confirmation and operations alerts go out only after the commit.
  #[instrument(
    name = "OrderEngine::create_order",
    skip_all,
    fields(lines = request.lines.len(), customer_id = ?actor.map(|c| c.id)),
    err(Display)
  )]
  pub async fn create_order(&self, request: OrderRequest, actor: Option<&Customer>) -> OrderResult<OrderWithItems> {
    let contact_email = request.validate(actor)?;
    let customer_id = actor.map(|customer| customer.id);

    let mut tx = self.store.begin().await?;
    let outcome = self.place_within(tx.as_mut(), &request, customer_id, contact_email).await;
    let placed = settle(tx, outcome).await?;

    info!(
      order_id = placed.order.id,
      order_number = %placed.order.order_number,
      final_amount = %placed.order.final_amount,
      "Order placed."
    );

    self.notify(OrderEvent::Confirmed(placed.order.clone()));
    self.notify(OrderEvent::AdminNewOrder(placed.order.clone()));
    Ok(placed)
  }

  async fn place_within(
    &self,
    tx: &mut dyn OrderTransaction,
    request: &OrderRequest,
    customer_id: Option<CustomerId>,
    contact_email: String,
  ) -> OrderResult<OrderWithItems> {
    let demand = quantities_by_variant(request.lines.iter().map(|line| (line.variant_id, line.quantity)));
    let mut reserved: BTreeMap<VariantId, VariantView> = BTreeMap::new();

    for (&variant_id, &quantity) in &demand {
      let view = self.reserve(tx, variant_id, quantity).await?;
      reserved.insert(variant_id, view);
    }

    let mut priced = Vec::with_capacity(request.lines.len());
    let mut items = Vec::with_capacity(request.lines.len());
    for line in &request.lines {
      let view = reserved.get(&line.variant_id).ok_or(OrderError::VariantNotFound {
        variant_id: line.variant_id,
      })?;
      priced.push(PricedLine::new(view.price, line.quantity));
      items.push(NewOrderItem {
        product_id: view.product_id,
        variant_id: view.variant_id,
        quantity: line.quantity,
        unit_price: view.price,
      });
    }

    let totals = self.shipping.current().quote(subtotal(&priced));

    let order = tx
      .insert_order(NewOrder {
        customer_id,
        order_number: Uuid::new_v4(),
        contact_email,
        shipping: request.shipping.clone(),
        totals,
        payment_method: request.payment_method,
      })
      .await?;
    let items = tx.insert_items(order.id, &items).await?;

    Ok(OrderWithItems { order, items })
  }

  /// Validates one variant against a read inside the transaction and takes `quantity`
  /// units of its stock. Returns the view the order items are priced from.
  async fn reserve(&self, tx: &mut dyn OrderTransaction, variant_id: VariantId, quantity: i32) -> OrderResult<VariantView> {
    let view = lookup_variant(&mut *tx, variant_id).await.map_err(|e| {
      warn!(variant_id, "Order rejected: unknown variant.");
      e
    })?;

    if !view.is_active {
      warn!(product_id = view.product_id, "Order rejected: product is not for sale.");
      return Err(OrderError::ProductInactive {
        product_id: view.product_id,
        product_name: view.product_name,
      });
    }

    let insufficient = |view: &VariantView| OrderError::InsufficientStock {
      variant_id: view.variant_id,
      variant_name: view.variant_name.clone(),
      requested: quantity,
      available: view.stock_quantity,
    };

    if !view.has_stock_for(quantity) {
      warn!(variant_id, requested = quantity, available = view.stock_quantity, "Order rejected: insufficient stock.");
      return Err(insufficient(&view));
    }

    if view.has_stock_tracking {
      match tx.adjust_stock(variant_id, -quantity).await? {
        Some(remaining) => debug!(variant_id, remaining, "Stock decremented."),
        None => {
          warn!(variant_id, requested = quantity, "Order rejected: stock changed underneath.");
          return Err(insufficient(&view));
        }
      }
    }

    Ok(view)
  }
}
