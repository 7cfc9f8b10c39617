#![allow(missing_docs)]
#![allow(dead_code)]

pub const STR1: &[u8] = b"abcdefgh";
pub const STR2: &[u8] = b"0123";

// A response body delivered the way a socket hands it over: uneven packets,
// with a seam right after the first line.
#[rustfmt::skip]
pub const PACKETS: [&[u8]; 5] = [
    b"HTTP payload line one\n",
    b"line",
    b" two\nline three is a bit longer than the others\n",
    b"l",
    b"ine four\n",
];
