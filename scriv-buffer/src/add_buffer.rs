/// Append-only buffer all inserted text lands in. Grows monotonically;
/// never shrinks during editing (§5). A failed append leaves the buffer
/// truncated back to its pre-append length so the piece list and
/// `add_buffer` never disagree about what exists.
#[derive(Debug, Default)]
pub(crate) struct AddBuffer {
    bytes: Vec<u8>,
}

impl AddBuffer {
    pub fn new() -> AddBuffer {
        AddBuffer { bytes: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Reserve space ahead of a multi-piece operation so the append below
    /// is infallible once begun (§4.1 capacity policy).
    pub fn reserve(&mut self, additional: usize) {
        self.bytes.reserve(additional);
    }

    /// Append `data`, returning the start offset it was written at.
    pub fn append(&mut self, data: &[u8]) -> usize {
        let start = self.bytes.len();
        self.bytes.extend_from_slice(data);
        start
    }

    pub fn truncate(&mut self, len: usize) {
        self.bytes.truncate(len);
    }
}
