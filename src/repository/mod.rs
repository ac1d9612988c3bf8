//! Running units of work against a provided context.

use crate::context::FileContext;
use crate::core::Result;
use crate::provider::FileContextProvider;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

/// Base for repositories that work through a [`FileContext`].
///
/// Each call asks the provider for a context and hands it, by value, to the
/// unit of work. The unit decides whether to save; a context dropped without
/// saving discards its in-memory changes. Provider and unit-of-work errors
/// are returned as-is, with no retry.
pub struct FileContextRepository<C, P: ?Sized> {
    provider: Arc<P>,
    _context: PhantomData<fn() -> C>,
}

impl<C, P: ?Sized> Clone for FileContextRepository<C, P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            _context: PhantomData,
        }
    }
}

impl<C, P> FileContextRepository<C, P>
where
    C: FileContext,
    P: FileContextProvider<C> + ?Sized,
{
    pub fn new(provider: Arc<P>) -> Self {
        Self {
            provider,
            _context: PhantomData,
        }
    }

    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }

    pub async fn execute_in_context<F, Fut>(&self, action: F) -> Result<()>
    where
        F: FnOnce(C) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        self.execute_in_context_with(action).await
    }

    pub async fn execute_in_context_with<F, Fut, R>(&self, function: F) -> Result<R>
    where
        F: FnOnce(C) -> Fut,
        Fut: Future<Output = Result<R>>,
    {
        let context = self.provider.get_file_context().await?;
        function(context).await
    }
}
