//! Form body parsing module
//!
//! Collects a request body and decodes it as
//! `application/x-www-form-urlencoded`. The same map type is used for
//! query strings.

use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use std::collections::HashMap;

/// Failure while reading or decoding a form body
#[derive(Debug, thiserror::Error)]
pub enum BodyError {
    #[error("request body exceeds {limit} bytes")]
    TooLarge { limit: usize },
    #[error("failed to read request body: {0}")]
    Read(String),
    #[error("request body is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Decoded form fields; a repeated key keeps its last value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    fields: HashMap<String, String>,
}

impl FormData {
    /// Parse an urlencoded string (`a=1&b=two+words`)
    pub fn parse(input: &str) -> Self {
        let fields = url::form_urlencoded::parse(input.as_bytes())
            .into_owned()
            .collect();
        Self { fields }
    }

    /// Parse an optional query string
    pub fn from_query(query: Option<&str>) -> Self {
        query.map(Self::parse).unwrap_or_default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Read the whole body, then parse it as a form
///
/// Frames are buffered in arrival order and only decoded once the stream
/// has ended. At most `limit` bytes are accepted.
pub async fn parse_form<B>(body: B, limit: usize) -> Result<FormData, BodyError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let collected = Limited::new(body, limit).collect().await.map_err(|e| {
        if e.downcast_ref::<LengthLimitError>().is_some() {
            BodyError::TooLarge { limit }
        } else {
            BodyError::Read(e.to_string())
        }
    })?;

    let text = String::from_utf8(collected.to_bytes().to_vec())?;
    Ok(FormData::parse(&text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::Full;
    use hyper::body::Frame;
    use std::collections::VecDeque;
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    /// Body that yields its chunks one frame at a time, then optionally fails
    struct ChunkedBody {
        chunks: VecDeque<Bytes>,
        fail_at_end: bool,
    }

    impl ChunkedBody {
        fn new(chunks: &[&[u8]], fail_at_end: bool) -> Self {
            Self {
                chunks: chunks.iter().map(|c| Bytes::copy_from_slice(c)).collect(),
                fail_at_end,
            }
        }
    }

    impl Body for ChunkedBody {
        type Data = Bytes;
        type Error = io::Error;

        fn poll_frame(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
        ) -> Poll<Option<Result<Frame<Bytes>, io::Error>>> {
            if let Some(chunk) = self.chunks.pop_front() {
                return Poll::Ready(Some(Ok(Frame::data(chunk))));
            }
            if self.fail_at_end {
                self.fail_at_end = false;
                return Poll::Ready(Some(Err(io::Error::new(
                    io::ErrorKind::ConnectionReset,
                    "connection reset",
                ))));
            }
            Poll::Ready(None)
        }
    }

    #[test]
    fn test_parse_plus_and_percent() {
        let form = FormData::parse("name=Harry+Potter&house=Gryffindor");
        assert_eq!(form.get("name"), Some("Harry Potter"));
        assert_eq!(form.get("house"), Some("Gryffindor"));
        assert_eq!(form.len(), 2);

        let form = FormData::parse("name=Ron%20Weasley&note=a%26b");
        assert_eq!(form.get("name"), Some("Ron Weasley"));
        assert_eq!(form.get("note"), Some("a&b"));
    }

    #[test]
    fn test_last_write_wins() {
        let form = FormData::parse("house=Slytherin&house=Gryffindor");
        assert_eq!(form.get("house"), Some("Gryffindor"));
    }

    #[test]
    fn test_missing_key_is_none() {
        let form = FormData::parse("name=Harry");
        assert_eq!(form.get("house"), None);
        assert!(FormData::from_query(None).is_empty());
    }

    #[tokio::test]
    async fn test_parse_form_full_body() {
        let body = Full::new(Bytes::from_static(b"name=Harry+Potter&house=Gryffindor"));
        let form = parse_form(body, 1024).await.unwrap();
        assert_eq!(form.get("name"), Some("Harry Potter"));
        assert_eq!(form.get("house"), Some("Gryffindor"));
    }

    #[tokio::test]
    async fn test_chunks_are_joined_before_decoding() {
        // "é" is split across two frames
        let body = ChunkedBody::new(&[b"name=Ren\xc3", b"\xa9e&house=Raven", b"claw"], false);
        let form = parse_form(body, 1024).await.unwrap();
        assert_eq!(form.get("name"), Some("Renée"));
        assert_eq!(form.get("house"), Some("Ravenclaw"));
    }

    #[tokio::test]
    async fn test_stream_error_propagates() {
        let body = ChunkedBody::new(&[b"name=Harry"], true);
        let result = parse_form(body, 1024).await;
        assert!(matches!(result, Err(BodyError::Read(_))));
    }

    #[tokio::test]
    async fn test_body_limit() {
        let body = Full::new(Bytes::from_static(b"name=Hermione+Granger"));
        let result = parse_form(body, 8).await;
        assert!(matches!(result, Err(BodyError::TooLarge { limit: 8 })));
    }

    #[tokio::test]
    async fn test_invalid_utf8() {
        let body = Full::new(Bytes::from_static(b"name=\xff\xfe"));
        let result = parse_form(body, 1024).await;
        assert!(matches!(result, Err(BodyError::InvalidUtf8(_))));
    }
}
