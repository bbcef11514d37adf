//! Lazy page and item streams

use super::client::ListClient;
use super::options::ListOptions;
use super::page::{Cursor, Page};
use crate::context::CallContext;
use crate::error::{Error, PageStage, Result};
use crate::scope::ScopeId;
use futures::stream::{self, Stream, TryStreamExt};

enum State {
    Start,
    Next(Cursor),
    Done,
}

impl<T> ListClient<T> {
    /// Stream pages one at a time
    ///
    /// A page is only requested when the previous one has been consumed. The
    /// stream ends after the terminal page or after the first error.
    pub fn pages<'a>(
        &'a self,
        ctx: &'a CallContext,
        scope: &'a ScopeId,
        options: &'a ListOptions,
    ) -> impl Stream<Item = Result<Page<T>>> + 'a
    where
        T: 'a,
    {
        stream::unfold(State::Start, move |state| async move {
            let result = match state {
                State::Start => self
                    .fetch_first_page(ctx, scope, options)
                    .await
                    .map_err(|e| e.on_page(PageStage::InitialPage)),
                State::Next(cursor) => self
                    .fetch_cursor(ctx, &cursor)
                    .await
                    .map_err(|e| e.on_page(PageStage::NextPage)),
                State::Done => return None,
            };

            let next = match &result {
                Ok(page) => page.cursor().map_or(State::Done, State::Next),
                Err(_) => State::Done,
            };
            Some((result, next))
        })
    }

    /// Stream items across all pages
    pub fn items<'a>(
        &'a self,
        ctx: &'a CallContext,
        scope: &'a ScopeId,
        options: &'a ListOptions,
    ) -> impl Stream<Item = Result<T>> + 'a
    where
        T: 'a,
    {
        self.pages(ctx, scope, options)
            .map_ok(|page| stream::iter(page.items.into_iter().map(Ok::<T, Error>)))
            .try_flatten()
    }
}
