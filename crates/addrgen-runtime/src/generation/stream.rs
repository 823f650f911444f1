//! Per-subscriber output streams.
//!
//! Each subscriber gets its own broadcast receiver, so any number of viewers
//! can follow the same process. Dropping a stream only drops the receiver;
//! the process is unaffected.

use addrgen_core::StreamEvent;
use async_stream::stream;
use futures_util::Stream;
use tokio::sync::broadcast::error::RecvError;
use tracing::debug;

use crate::registry::Subscription;

/// Turn a registry subscription into the event sequence a viewer sees.
///
/// The first event is always `status`. `complete` is always the last one,
/// including for processes that were already finished on attach.
pub(crate) fn event_stream(
    subscription: Subscription,
) -> impl Stream<Item = StreamEvent> + Send + 'static {
    let Subscription {
        status,
        error,
        outcome,
        receiver,
    } = subscription;

    stream! {
        yield StreamEvent::Status { status, error };

        let Some(mut receiver) = receiver else {
            yield StreamEvent::complete(outcome);
            return;
        };

        loop {
            match receiver.recv().await {
                Ok(event) => {
                    let event = StreamEvent::from_process_event(event);
                    let done = event.is_complete();
                    yield event;
                    if done {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "Stream subscriber lagged, events dropped");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }
}
