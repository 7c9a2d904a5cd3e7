use actix_web::{HttpResponse, Result, web};
use futures_util::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

use crate::events::EventBroadcaster;

/// Server-sent events feed of entity changes and live ranking ticks.
///
/// Fire-and-forget: a subscriber that lags far enough behind to overflow the
/// channel silently skips the lost events, and a client that reconnects gets
/// no replay; it is expected to do a full fetch.
pub async fn stream(broadcaster: web::Data<EventBroadcaster>) -> Result<HttpResponse> {
    let rx = broadcaster.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|event| async move {
        match event {
            Ok(event) => {
                let data = serde_json::to_string(&event).ok()?;
                let frame = format!("event: {}\ndata: {}\n\n", event.topic, data);
                Some(Ok::<web::Bytes, actix_web::Error>(web::Bytes::from(frame)))
            }
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                log::warn!("SSE subscriber lagged, skipped {} events", skipped);
                None
            }
        }
    });

    Ok(HttpResponse::Ok()
        .insert_header(("Content-Type", "text/event-stream"))
        .insert_header(("Cache-Control", "no-cache"))
        .streaming(stream))
}
