//! Incremental boundary detection for a stream of JSON values.
//!
//! The feed is a continuous sequence of JSON objects separated by arbitrary
//! whitespace, with no length prefix. [`JsonFramer`] is fed bytes as they
//! arrive and reports where the current top-level value ends, so the reader
//! only ever buffers one value at a time. It does not validate JSON; that is
//! left to the decoder.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum State {
    /// Between values, skipping whitespace.
    #[default]
    Idle,
    /// Inside an object or array.
    Container,
    /// Inside a top-level string.
    Str,
    /// Inside a top-level number or literal.
    Scalar,
}

#[derive(Clone, Debug, Default)]
pub struct JsonFramer {
    state: State,
    depth: usize,
    in_string: bool,
    escaped: bool,
}

impl JsonFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan `input` for the end of the current value.
    ///
    /// Returns `Some(n)` when the value ends after the first `n` bytes of
    /// `input`; the framer is then reset for the next value. Returns `None`
    /// when all of `input` belongs to the current (still incomplete) value or
    /// to whitespace between values.
    pub fn scan(&mut self, input: &[u8]) -> Option<usize> {
        for (i, &b) in input.iter().enumerate() {
            match self.state {
                State::Idle => match b {
                    b if is_whitespace(b) => {}
                    b'{' | b'[' => {
                        self.state = State::Container;
                        self.depth = 1;
                    }
                    b'"' => self.state = State::Str,
                    _ => self.state = State::Scalar,
                },
                State::Container => {
                    if self.in_string {
                        self.step_string(b);
                        continue;
                    }
                    match b {
                        b'"' => self.in_string = true,
                        b'{' | b'[' => self.depth += 1,
                        b'}' | b']' => {
                            self.depth -= 1;
                            if self.depth == 0 {
                                self.reset();
                                return Some(i + 1);
                            }
                        }
                        _ => {}
                    }
                }
                State::Str => {
                    self.in_string = true;
                    self.step_string(b);
                    if !self.in_string {
                        self.reset();
                        return Some(i + 1);
                    }
                }
                State::Scalar => {
                    // The delimiter is not part of the scalar.
                    if is_whitespace(b) || matches!(b, b'{' | b'[' | b'}' | b']' | b'"' | b',') {
                        self.reset();
                        return Some(i);
                    }
                }
            }
        }
        None
    }

    /// Signal end of input.
    ///
    /// Returns `true` if the bytes scanned so far form a value terminated by
    /// end of input (a bare top-level number or literal). Containers and
    /// strings still open are truncated and yield `false`. The framer is
    /// reset either way.
    pub fn finish(&mut self) -> bool {
        let complete = self.state == State::Scalar;
        self.reset();
        complete
    }

    /// Returns `true` if no value has started since the last boundary.
    pub fn is_idle(&self) -> bool {
        self.state == State::Idle
    }

    fn step_string(&mut self, b: u8) {
        if self.escaped {
            self.escaped = false;
        } else if b == b'\\' {
            self.escaped = true;
        } else if b == b'"' {
            self.in_string = false;
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}
