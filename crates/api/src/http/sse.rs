use std::collections::VecDeque;
use std::fmt::Display;

use futures_util::stream::{self, Stream, StreamExt};

use crate::client::{ApiError, PayloadStream};

/// Incremental `text/event-stream` decoder yielding the `data` of each event.
///
/// Lines are split on `\n` (a trailing `\r` is dropped); consecutive `data:`
/// lines are joined with `\n` and dispatched on a blank line. Comments and
/// the `event`/`id`/`retry` fields are ignored.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    data: Option<String>,
}

impl SseDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk and return every event completed by it.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);
        let mut ready = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            let line = String::from_utf8_lossy(&line[..line.len() - 1]);
            let line = line.strip_suffix('\r').unwrap_or(&line);
            if let Some(payload) = self.process_line(line) {
                ready.push(payload);
            }
        }
        ready
    }

    /// Flush whatever is left once the byte stream has ended.
    pub fn finish(&mut self) -> Option<String> {
        if !self.buffer.is_empty() {
            let rest = std::mem::take(&mut self.buffer);
            let line = String::from_utf8_lossy(&rest).into_owned();
            let line = line.strip_suffix('\r').unwrap_or(&line);
            if let Some(payload) = self.process_line(line) {
                return Some(payload);
            }
        }
        self.data.take()
    }

    fn process_line(&mut self, line: &str) -> Option<String> {
        if line.is_empty() {
            return self.data.take();
        }
        if line.starts_with(':') {
            return None;
        }
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        if field == "data" {
            match self.data.as_mut() {
                Some(data) => {
                    data.push('\n');
                    data.push_str(value);
                }
                None => self.data = Some(value.to_string()),
            }
        }
        None
    }
}

/// Turn a byte stream into a stream of event payloads.
///
/// A transport error is yielded once and ends the stream.
pub fn payload_stream<S, B, E>(bytes: S) -> PayloadStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send,
    E: Display + Send,
{
    let state = (Box::pin(bytes), SseDecoder::new(), VecDeque::new(), false);
    stream::unfold(state, |(mut bytes, mut decoder, mut ready, mut done)| async move {
        loop {
            if let Some(payload) = ready.pop_front() {
                return Some((Ok(payload), (bytes, decoder, ready, done)));
            }
            if done {
                return None;
            }
            match bytes.next().await {
                Some(Ok(chunk)) => ready.extend(decoder.feed(chunk.as_ref())),
                Some(Err(err)) => {
                    let err = ApiError::Stream(err.to_string());
                    return Some((Err(err), (bytes, decoder, ready, true)));
                }
                None => {
                    done = true;
                    ready.extend(decoder.finish());
                }
            }
        }
    })
    .boxed()
}
