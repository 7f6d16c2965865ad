//! Async driver: re-expresses a sequence's iteration through a scheduler
//!
//! `AsyncSequence` pulls its parent one element at a time and defers through
//! a [`Scheduler`] before every visitor invocation, so visitors never run in
//! the caller's stack and the host event loop can interleave other work.
//! The wrapper is deliberately not a [`Sequence`] itself: wrapping an
//! already-async sequence in `to_async` again does not compile.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use async_trait::async_trait;
use pin_project_lite::pin_project;
use tokio::time::{sleep, Sleep};

use super::core::{Sequence, Step};
use super::iter::{Pull, PullIterator};

/// Host-provided "run the next step later" primitive, resolved once per
/// async sequence
#[async_trait]
pub trait Scheduler: Send + Sync {
    async fn defer(&self, delay: Option<Duration>);
}

/// Default scheduler: a tokio sleep when an interval is present, otherwise
/// the highest-priority deferral available (`yield_now`)
pub struct TokioScheduler;

#[async_trait]
impl Scheduler for TokioScheduler {
    async fn defer(&self, delay: Option<Duration>) {
        match delay {
            Some(duration) => sleep(duration).await,
            None => tokio::task::yield_now().await,
        }
    }
}

/// A sequence whose iteration is paced through a scheduler
pub struct AsyncSequence<P> {
    parent: P,
    interval: Option<Duration>,
    scheduler: Arc<dyn Scheduler>,
}

impl<P> AsyncSequence<P>
where
    P: Sequence,
    P::Item: Clone,
{
    pub(crate) fn new(parent: P, interval: Option<Duration>) -> Self {
        AsyncSequence {
            parent,
            interval,
            scheduler: Arc::new(TokioScheduler),
        }
    }

    /// Substitute the scheduler primitive
    pub fn with_scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        self.scheduler = scheduler;
        self
    }

    /// Visit every element in source order, one scheduled step per element.
    /// Honors [`Step::Stop`] from the visitor.
    pub async fn each<F>(&self, mut f: F) -> Step
    where
        F: FnMut(P::Item) -> Step,
    {
        let mut it = Pull::new(&self.parent);
        while it.advance() {
            self.scheduler.defer(self.interval).await;
            if f(it.current()).is_stop() {
                return Step::Stop;
            }
        }
        Step::Continue
    }

    /// Visit every element, never stopping early
    pub async fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(P::Item),
    {
        self.each(|e| {
            f(e);
            Step::Continue
        })
        .await;
    }

    /// Materialize through the paced iteration
    pub async fn to_vec(&self) -> Vec<P::Item> {
        let mut items = Vec::new();
        self.each(|e| {
            items.push(e);
            Step::Continue
        })
        .await;
        items
    }

    /// Bridge into a `futures_core::Stream` with the same pacing
    pub fn into_stream(self) -> SeqStream<P> {
        SeqStream {
            iter: Pull::new(self.parent),
            delay: None,
            interval: self.interval,
            pending: None,
        }
    }
}

pin_project! {
    /// `futures_core::Stream` over a paced pull iteration
    #[must_use = "streams do nothing unless polled"]
    pub struct SeqStream<P>
    where
        P: Sequence,
    {
        iter: Pull<P>,
        #[pin]
        delay: Option<Sleep>,
        interval: Option<Duration>,
        pending: Option<P::Item>,
    }
}

impl<P> futures_core::Stream for SeqStream<P>
where
    P: Sequence,
    P::Item: Clone,
{
    type Item = P::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();
        loop {
            if this.pending.is_some() {
                if let Some(delay) = this.delay.as_mut().as_pin_mut() {
                    match delay.poll(cx) {
                        Poll::Ready(()) => this.delay.set(None),
                        Poll::Pending => return Poll::Pending,
                    }
                }
                return Poll::Ready(this.pending.take());
            }
            if this.iter.advance() {
                *this.pending = Some(this.iter.current());
                if let Some(interval) = *this.interval {
                    this.delay.set(Some(sleep(interval)));
                }
            } else {
                return Poll::Ready(None);
            }
        }
    }
}
