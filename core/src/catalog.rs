// stockline/src/catalog.rs

use async_trait::async_trait;
use tracing::debug;

use crate::error::{OrderError, OrderResult};
use crate::model::{VariantId, VariantView};

/// Read-only lookup of a variant together with its parent product.
///
/// Transactions implement this too, so placement and cancellation read through the same
/// snapshot they later mutate.
#[async_trait]
pub trait CatalogReader: Send {
  async fn variant_with_product(&mut self, variant_id: VariantId) -> OrderResult<Option<VariantView>>;
}

/// Resolves a variant or fails with `VariantNotFound`.
pub async fn lookup_variant<R>(reader: &mut R, variant_id: VariantId) -> OrderResult<VariantView>
where
  R: CatalogReader + ?Sized,
{
  match reader.variant_with_product(variant_id).await? {
    Some(view) => Ok(view),
    None => {
      debug!(variant_id, "Variant lookup missed.");
      Err(OrderError::VariantNotFound { variant_id })
    }
  }
}
