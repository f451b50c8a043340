//! Incremental splitter and decoder for the backend's
//! `multipart/x-mixed-replace; boundary=frame` camera streams.

/// One decoded RGBA frame from an MJPEG part.
#[derive(Clone)]
pub struct StreamFrame {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

pub fn decode_stream_frame(bytes: &[u8]) -> Result<StreamFrame, String> {
    let decoded = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    let rgba = decoded.to_rgba8();
    Ok(StreamFrame {
        width: rgba.width() as usize,
        height: rgba.height() as usize,
        rgba: rgba.into_raw(),
    })
}

const BOUNDARY: &[u8] = b"--frame";
const HEADER_END: &[u8] = b"\r\n\r\n";
/// Discard the buffer if no boundary shows up within this many bytes; the
/// endpoint is then not serving multipart frames at all.
const MAX_BUFFERED_BYTES: usize = 8 * 1024 * 1024;

/// Splits a raw multipart byte stream into complete part bodies. Feed it
/// chunks as they arrive; part boundaries may fall anywhere inside a chunk.
#[derive(Default)]
pub struct MultipartFrameSplitter {
    buffer: Vec<u8>,
}

impl MultipartFrameSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `chunk` and returns every part body completed by it.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Vec<u8>> {
        self.buffer.extend_from_slice(chunk);
        let mut frames = Vec::new();
        loop {
            let Some(start) = find_subsequence(&self.buffer, BOUNDARY) else {
                break;
            };
            let Some(header_end) = find_subsequence(&self.buffer[start..], HEADER_END) else {
                break;
            };
            let body_start = start + header_end + HEADER_END.len();
            let Some(next_boundary) = find_subsequence(&self.buffer[body_start..], BOUNDARY)
            else {
                break;
            };
            let mut body_end = body_start + next_boundary;
            // trim the CRLF that precedes the next boundary
            while body_end > body_start
                && (self.buffer[body_end - 1] == b'\n' || self.buffer[body_end - 1] == b'\r')
            {
                body_end -= 1;
            }
            frames.push(self.buffer[body_start..body_end].to_vec());
            self.buffer.drain(..body_start + next_boundary);
        }
        if frames.is_empty() && self.buffer.len() > MAX_BUFFERED_BYTES {
            self.buffer.clear();
        }
        frames
    }
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(body: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"--frame\r\nContent-Type: image/jpeg\r\n\r\n");
        bytes.extend_from_slice(body);
        bytes.extend_from_slice(b"\r\n");
        bytes
    }

    #[test]
    fn splits_consecutive_parts() {
        let mut stream = Vec::new();
        stream.extend_from_slice(&part(b"first-jpeg"));
        stream.extend_from_slice(&part(b"second-jpeg"));
        stream.extend_from_slice(b"--frame\r\n"); // opening of an unfinished part

        let mut splitter = MultipartFrameSplitter::new();
        let frames = splitter.push(&stream);
        assert_eq!(frames, vec![b"first-jpeg".to_vec(), b"second-jpeg".to_vec()]);
    }

    #[test]
    fn recovers_parts_across_arbitrary_chunk_boundaries() {
        let mut stream = Vec::new();
        stream.extend_from_slice(&part(b"alpha"));
        stream.extend_from_slice(&part(b"beta"));
        stream.extend_from_slice(&part(b"gamma"));
        stream.extend_from_slice(b"--frame");

        let mut splitter = MultipartFrameSplitter::new();
        let mut frames = Vec::new();
        for chunk in stream.chunks(7) {
            frames.extend(splitter.push(chunk));
        }
        assert_eq!(
            frames,
            vec![b"alpha".to_vec(), b"beta".to_vec(), b"gamma".to_vec()]
        );
    }

    #[test]
    fn incomplete_part_yields_nothing_until_the_next_boundary() {
        let mut splitter = MultipartFrameSplitter::new();
        assert!(splitter
            .push(b"--frame\r\nContent-Type: image/jpeg\r\n\r\npartial-jpeg")
            .is_empty());
        let frames = splitter.push(b"-more\r\n--frame");
        assert_eq!(frames, vec![b"partial-jpeg-more".to_vec()]);
    }

    #[test]
    fn body_bytes_are_preserved_verbatim() {
        // JPEG bodies are binary; CR/LF inside the body must survive
        let body = b"\xff\xd8\x01\r\n\x02\xff\xd9";
        let mut stream = part(body);
        stream.extend_from_slice(b"--frame");

        let mut splitter = MultipartFrameSplitter::new();
        let frames = splitter.push(&stream);
        assert_eq!(frames, vec![body.to_vec()]);
    }
}
