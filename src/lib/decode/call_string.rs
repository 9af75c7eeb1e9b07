//! Indel extraction from mpileup call-strings.
//!
//! A call-string interleaves single-base calls with two multi-character tokens
//! that are not calls themselves:
//!
//! - `^<q>`: start of a read, `<q>` is its mapping quality encoded as one char
//! - `+<N><seq>` / `-<N><seq>`: an insertion / deletion of `N` bases
//!
//! [`strip_indels`] removes both in a single forward scan, building a new
//! buffer rather than splicing the input. Positions are only ever read from the
//! input string, so there is no offset to correct: after each step
//! `consumed - produced` equals the number of bytes dropped so far.

use smartstring::alias::String;

/// One `+N<seq>` / `-N<seq>` token, uppercased.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndelCall {
    /// Declared indel length `N`.
    pub length: u32,
    /// Marker, length and sequence, e.g. `+2AG`.
    pub call: String,
}

/// Result of [`strip_indels`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StrippedCalls {
    /// Remaining calls: bases, match symbols and the bare `+`/`-` markers.
    pub calls: Vec<u8>,
    /// Indel tokens in left-to-right order.
    pub indels: Vec<IndelCall>,
}

/// Split a call-string into per-read calls and indel tokens.
///
/// The `+`/`-` marker of each indel stays in [`StrippedCalls::calls`] so that
/// insertions and deletions can still be counted per read; its digits and
/// sequence are removed. A declared length running past the end of the string
/// takes whatever remains. A `+`/`-` not followed by a digit is kept as-is.
pub fn strip_indels(call_string: &str) -> StrippedCalls {
    let bytes = call_string.as_bytes();
    let len = bytes.len();
    let mut stripped = StrippedCalls {
        calls: Vec::with_capacity(len),
        indels: Vec::new(),
    };

    let mut i = 0;
    while i < len {
        match bytes[i] {
            b'^' => {
                i = (i + 2).min(len);
            }
            marker @ (b'+' | b'-') if bytes.get(i + 1).map_or(false, u8::is_ascii_digit) => {
                let mut seq_start = i + 1;
                let mut length: u32 = 0;
                while seq_start < len && bytes[seq_start].is_ascii_digit() {
                    length = length
                        .saturating_mul(10)
                        .saturating_add((bytes[seq_start] - b'0') as u32);
                    seq_start += 1;
                }
                let seq_end = seq_start.saturating_add(length as usize).min(len);

                let token = std::string::String::from_utf8_lossy(&bytes[i..seq_end]);
                stripped.indels.push(IndelCall {
                    length,
                    call: String::from(token.to_ascii_uppercase().as_str()),
                });
                stripped.calls.push(marker);
                i = seq_end;
            }
            other => {
                stripped.calls.push(other);
                i += 1;
            }
        }
    }

    stripped
}
