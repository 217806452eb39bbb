//! Access-logging response body
//!
//! `LoggedBody` wraps the body of every response the dispatcher returns and
//! writes exactly one access-log entry when that body completes: after its
//! last frame has been handed to the connection, or when the connection
//! drops it early. Handlers only produce plain responses, so they cannot
//! skip the log line.

use crate::logger::AccessLogEntry;
use http_body_util::Full;
use hyper::body::{Body, Bytes, Frame, SizeHint};
use hyper::Response;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

/// Destination for completed access log entries
pub type AccessSink = Arc<dyn Fn(&AccessLogEntry) + Send + Sync>;

/// Response body that reports itself to an [`AccessSink`] once
pub struct LoggedBody<B = Full<Bytes>> {
    inner: B,
    pending: Option<AccessLogEntry>,
    sink: AccessSink,
    sent: usize,
}

impl<B> LoggedBody<B> {
    fn finish(&mut self) {
        if let Some(mut entry) = self.pending.take() {
            entry.body_bytes = self.sent;
            entry.request_time_us =
                u64::try_from(entry.received.elapsed().as_micros()).unwrap_or(u64::MAX);
            (self.sink)(&entry);
        }
    }
}

impl<B> Body for LoggedBody<B>
where
    B: Body<Data = Bytes> + Unpin,
{
    type Data = Bytes;
    type Error = B::Error;

    fn poll_frame(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Bytes>, B::Error>>> {
        let this = &mut *self;
        let polled = Pin::new(&mut this.inner).poll_frame(cx);
        match &polled {
            Poll::Ready(Some(Ok(frame))) => {
                if let Some(data) = frame.data_ref() {
                    this.sent += data.len();
                }
                if this.inner.is_end_stream() {
                    this.finish();
                }
            }
            Poll::Ready(Some(Err(_)) | None) => this.finish(),
            Poll::Pending => {}
        }
        polled
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

impl<B> Drop for LoggedBody<B> {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Attach the access-log hook to a finished response
///
/// `entry` carries the request side (method, path, ...); the status is taken
/// from `response` and the byte count from what is actually written. The
/// logged duration starts when `entry` was created, so handler time counts.
pub fn wrap<B>(
    response: Response<B>,
    mut entry: AccessLogEntry,
    sink: AccessSink,
) -> Response<LoggedBody<B>> {
    entry.status = response.status().as_u16();
    response.map(|inner| LoggedBody {
        inner,
        pending: Some(entry),
        sink,
        sent: 0,
    })
}
