//! File contexts: a fixed group of entity sets saved together.

use crate::core::Result;
use crate::set::FileSet;
use async_trait::async_trait;
use tracing::debug;

/// Owner of a fixed collection of entity sets, one per entity type.
///
/// Implementors declare their sets as fields and list them in
/// [`file_sets`](FileContext::file_sets); callers work with the typed fields
/// directly and call [`save`](FileContext::save) when the unit of work is
/// done.
///
/// ```ignore
/// struct ShopContext {
///     customers: JsonFileSet<Customer>,
///     orders: JsonFileSet<Order>,
/// }
///
/// impl FileContext for ShopContext {
///     fn file_sets(&self) -> Vec<&dyn FileSet> {
///         vec![&self.customers, &self.orders]
///     }
/// }
/// ```
#[async_trait]
pub trait FileContext: Send + Sync {
    /// Every set owned by this context, in save order.
    ///
    /// This is the hook [`save`](FileContext::save) iterates over; it must
    /// return the same sets in the same order on every call.
    fn file_sets(&self) -> Vec<&dyn FileSet>;

    /// Saves each owned set in turn.
    ///
    /// Saving is best-effort and stops at the first failure: sets earlier in
    /// the order stay written, the failing set's error is returned, and the
    /// remaining sets are not attempted. Nothing is rolled back.
    async fn save(&self) -> Result<()> {
        let file_sets = self.file_sets();
        let total = file_sets.len();
        for (index, file_set) in file_sets.into_iter().enumerate() {
            if let Err(err) = file_set.save().await {
                debug!(
                    path = %file_set.path().display(),
                    saved = index,
                    skipped = total - index - 1,
                    "context save stopped at failing file set"
                );
                return Err(err);
            }
        }
        debug!(file_sets = total, "context saved");
        Ok(())
    }
}
