//! Service Interception Module
//!
//! A tower [`Layer`] that memoizes any [`Service`] whose requests can serve
//! as cache arguments. The wrapped service keeps its `Service` interface, so
//! callers cannot tell it apart from the original.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tower::{Layer, Service};

use crate::cache::{Arguments, MemoCache, OperationId};
use crate::config::MemoizerConfig;

/// Boxed response future of a [`MemoizeService`].
pub type ResponseFuture<T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send>>;

// == Layer ==
/// Wraps services in a [`MemoizeService`] sharing one cache.
#[derive(Debug, Clone)]
pub struct MemoizeLayer {
    cache: Arc<MemoCache>,
    operation: OperationId,
}

impl MemoizeLayer {
    /// Creates a layer with its own cache.
    ///
    /// `operation` names the wrapped service; services layered with the
    /// same cache must use distinct names.
    pub fn new(config: MemoizerConfig, operation: OperationId) -> Self {
        Self::with_cache(Arc::new(MemoCache::new(config)), operation)
    }

    /// Creates a layer on top of an existing cache.
    pub fn with_cache(cache: Arc<MemoCache>, operation: OperationId) -> Self {
        Self { cache, operation }
    }

    pub fn cache(&self) -> &Arc<MemoCache> {
        &self.cache
    }
}

impl<S> Layer<S> for MemoizeLayer {
    type Service = MemoizeService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MemoizeService {
            inner,
            cache: Arc::clone(&self.cache),
            operation: self.operation,
        }
    }
}

// == Service ==
/// Memoizing wrapper around a service.
///
/// Requests are the cache arguments; responses are cloned out of the cache
/// on a hit and the inner service is not called.
#[derive(Debug, Clone)]
pub struct MemoizeService<S> {
    inner: S,
    cache: Arc<MemoCache>,
    operation: OperationId,
}

impl<S> MemoizeService<S> {
    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn cache(&self) -> &Arc<MemoCache> {
        &self.cache
    }
}

impl<S, Req> Service<Req> for MemoizeService<S>
where
    S: Service<Req> + Clone + Send + 'static,
    S::Future: Send,
    S::Response: Clone + Send + Sync + 'static,
    S::Error: Send + 'static,
    Req: Arguments + Clone,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = ResponseFuture<S::Response, S::Error>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Req) -> Self::Future {
        // Take the service that was driven to readiness, leave a clone behind
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let cache = Arc::clone(&self.cache);
        let operation = self.operation;

        Box::pin(async move {
            cache
                .call_async(operation, request.clone(), move || inner.call(request))
                .await
        })
    }
}
