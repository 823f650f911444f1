//! SSE framing for generation event streams.
//!
//! Each `StreamEvent` becomes one SSE message whose data is the event's JSON
//! form (`{"type":"output","data":"..."}`). The response ends after the
//! `complete` event.

use std::convert::Infallible;
use std::time::Duration;

use addrgen_core::StreamEvent;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::stream::Stream;
use tokio_stream::StreamExt;

/// Interval between keep-alive comments on idle streams.
const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(30);

/// Wrap a generation event stream in an SSE response.
///
/// Includes a keep-alive ping every 30 seconds to prevent proxy timeouts.
pub fn event_sse<S>(
    events: S,
) -> Sse<impl Stream<Item = Result<Event, Infallible>> + Send + 'static>
where
    S: Stream<Item = StreamEvent> + Send + 'static,
{
    let stream = events.filter_map(|event| match to_sse_event(&event) {
        Ok(sse_event) => Some(Ok(sse_event)),
        Err(e) => {
            tracing::warn!("Failed to serialize stream event: {}", e);
            None
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(KEEP_ALIVE_INTERVAL).text("ping"))
}

fn to_sse_event(event: &StreamEvent) -> Result<Event, serde_json::Error> {
    let json = serde_json::to_string(event)?;
    Ok(Event::default().data(json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use addrgen_core::ProcessStatus;

    #[test]
    fn events_serialize_with_type_tag() {
        let json = serde_json::to_value(StreamEvent::Status {
            status: ProcessStatus::Running,
            error: None,
        })
        .unwrap();
        assert_eq!(json["type"], "status");
        assert_eq!(json["status"], "running");

        let json = serde_json::to_value(StreamEvent::Output {
            data: "Generated 10 of 100".into(),
        })
        .unwrap();
        assert_eq!(json["type"], "output");
        assert_eq!(json["data"], "Generated 10 of 100");
    }

    #[test]
    fn every_event_converts() {
        let events = [
            StreamEvent::Error { data: "boom".into() },
            StreamEvent::Complete {
                code: Some(0),
                signal: None,
            },
        ];
        for event in &events {
            assert!(to_sse_event(event).is_ok());
        }
    }
}
