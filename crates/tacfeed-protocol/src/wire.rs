//! Low-level, bounds-checked access to raw datagram bytes.
//!
//! The feed has no CRC and no self-describing lengths beyond per-record
//! counts, so a truncated or corrupted datagram is routine. Every accessor in
//! this module therefore degrades instead of failing: an out-of-range read
//! logs a warning and yields `0` (or the available prefix, for strings and
//! bit reads). Decoders check record widths up front with
//! [`Cursor::has`] and use these reads only once they know the bytes exist,
//! so in practice the zero fallback is a last line of defence.
//!
//! - [`WireReader`] — random access by byte offset, big-endian.
//! - [`Cursor`] — a [`WireReader`] plus a position that advances per read.
//! - [`BitView`] — bit-granular reads over a binary-digit view of a buffer.

use tracing::warn;

// ---------------------------------------------------------------------------
// WireReader
// ---------------------------------------------------------------------------

/// Read-only, big-endian view over a datagram.
///
/// `WireReader` is `Copy`: it is just a borrowed slice, so passing it
/// around costs nothing.
#[derive(Debug, Clone, Copy)]
pub struct WireReader<'a> {
    buf: &'a [u8],
}

impl<'a> WireReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    /// Total length of the underlying buffer in bytes.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Returns `true` if `width` bytes starting at `offset` are in bounds.
    ///
    /// Uses `checked_add` so a hostile offset near `usize::MAX` can't wrap.
    pub fn has(&self, offset: usize, width: usize) -> bool {
        offset
            .checked_add(width)
            .is_some_and(|end| end <= self.buf.len())
    }

    /// Copies `N` bytes starting at `offset`, or `None` (with a warning)
    /// if that would run past the end of the buffer.
    fn array<const N: usize>(&self, offset: usize, kind: &'static str) -> Option<[u8; N]> {
        if !self.has(offset, N) {
            warn!(kind, offset, width = N, len = self.buf.len(), "read out of bounds");
            return None;
        }
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[offset..offset + N]);
        Some(out)
    }

    pub fn u8(&self, offset: usize) -> u8 {
        self.array::<1>(offset, "u8").map_or(0, |b| b[0])
    }

    pub fn u16_be(&self, offset: usize) -> u16 {
        self.array(offset, "u16").map_or(0, u16::from_be_bytes)
    }

    pub fn i16_be(&self, offset: usize) -> i16 {
        self.array(offset, "i16").map_or(0, i16::from_be_bytes)
    }

    pub fn u32_be(&self, offset: usize) -> u32 {
        self.array(offset, "u32").map_or(0, u32::from_be_bytes)
    }

    pub fn i32_be(&self, offset: usize) -> i32 {
        self.array(offset, "i32").map_or(0, i32::from_be_bytes)
    }

    /// Big-endian IEEE-754 single precision.
    pub fn f32_be(&self, offset: usize) -> f32 {
        self.array(offset, "f32").map_or(0.0, f32::from_be_bytes)
    }

    /// Reads a fixed-width, NUL-padded text field.
    ///
    /// NUL bytes are dropped wherever they appear and surrounding
    /// whitespace is trimmed. Bytes are mapped one-to-one onto Latin-1
    /// characters, so a non-ASCII byte never makes the read fail. If the
    /// field runs past the buffer, the available prefix is used.
    pub fn fixed_str(&self, offset: usize, len: usize) -> String {
        let start = offset.min(self.buf.len());
        let end = offset.saturating_add(len).min(self.buf.len());
        if end - start < len {
            warn!(offset, width = len, len = self.buf.len(), "string field truncated");
        }
        let text: String = self.buf[start..end]
            .iter()
            .filter(|&&b| b != 0)
            .map(|&b| b as char)
            .collect();
        text.trim().to_string()
    }
}

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

/// A [`WireReader`] with a read position.
///
/// Each `take_*` reads at the current position and advances past the field,
/// which keeps the decoders a straight top-to-bottom transcription of the
/// record layout.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    reader: WireReader<'a>,
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Starts a cursor at byte `pos` of `buf`.
    pub fn new(buf: &'a [u8], pos: usize) -> Self {
        Self {
            reader: WireReader::new(buf),
            pos,
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.reader.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reader.is_empty()
    }

    /// Bytes left between the cursor and the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.reader.len().saturating_sub(self.pos)
    }

    /// Returns `true` if at least `width` more bytes are available.
    pub fn has(&self, width: usize) -> bool {
        self.reader.has(self.pos, width)
    }

    /// Skips `n` bytes (reserved/padding fields).
    pub fn skip(&mut self, n: usize) {
        self.pos = self.pos.saturating_add(n);
    }

    pub fn take_u8(&mut self) -> u8 {
        let v = self.reader.u8(self.pos);
        self.skip(1);
        v
    }

    pub fn take_u16(&mut self) -> u16 {
        let v = self.reader.u16_be(self.pos);
        self.skip(2);
        v
    }

    pub fn take_i16(&mut self) -> i16 {
        let v = self.reader.i16_be(self.pos);
        self.skip(2);
        v
    }

    pub fn take_u32(&mut self) -> u32 {
        let v = self.reader.u32_be(self.pos);
        self.skip(4);
        v
    }

    pub fn take_i32(&mut self) -> i32 {
        let v = self.reader.i32_be(self.pos);
        self.skip(4);
        v
    }

    pub fn take_f32(&mut self) -> f32 {
        let v = self.reader.f32_be(self.pos);
        self.skip(4);
        v
    }

    pub fn take_bytes<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        for slot in &mut out {
            *slot = self.take_u8();
        }
        out
    }

    pub fn take_str(&mut self, len: usize) -> String {
        let v = self.reader.fixed_str(self.pos, len);
        self.skip(len);
        v
    }
}

// ---------------------------------------------------------------------------
// BitView
// ---------------------------------------------------------------------------

/// A binary-digit view of a buffer for bit-granular field access.
///
/// Built either from raw bytes (MSB first) or from a datagram that is
/// itself ASCII text made of `'0'` and `'1'` characters, which some
/// transmitters emit in test mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitView {
    bits: Vec<bool>,
}

impl BitView {
    /// Expands every byte into eight bits, most significant first.
    pub fn from_bytes(buf: &[u8]) -> Self {
        let bits = buf
            .iter()
            .flat_map(|&b| (0..8).rev().map(move |i| (b >> i) & 1 == 1))
            .collect();
        Self { bits }
    }

    /// Interprets `buf` as ASCII binary digits.
    ///
    /// Surrounding ASCII whitespace is ignored. Returns `None` if anything
    /// other than `'0'`/`'1'` remains, or if nothing remains at all.
    pub fn from_ascii(buf: &[u8]) -> Option<Self> {
        let digits = buf.trim_ascii();
        if digits.is_empty() || !Self::is_ascii_binary(digits) {
            return None;
        }
        Some(Self {
            bits: digits.iter().map(|&b| b == b'1').collect(),
        })
    }

    /// Returns `true` if every byte is an ASCII `'0'` or `'1'`.
    pub fn is_ascii_binary(buf: &[u8]) -> bool {
        buf.iter().all(|&b| b == b'0' || b == b'1')
    }

    /// Number of bits in the view.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Reads `bit_len` bits (at most 64) starting at `bit_offset` as an
    /// unsigned big-endian integer.
    ///
    /// A start past the end yields `0`. A read that straddles the end uses
    /// the available bits and pads the missing low-order bits with zeros.
    pub fn read_bits(&self, bit_offset: usize, bit_len: usize) -> u64 {
        let bit_len = bit_len.min(64);
        if bit_offset >= self.bits.len() {
            warn!(bit_offset, len = self.bits.len(), "bit read starts out of bounds");
            return 0;
        }
        let available = (self.bits.len() - bit_offset).min(bit_len);
        if available < bit_len {
            warn!(
                bit_offset,
                bit_len,
                len = self.bits.len(),
                "bit read overflows buffer, zero-padding"
            );
        }
        let mut value = 0u64;
        for i in 0..bit_len {
            let bit = i < available && self.bits[bit_offset + i];
            value = (value << 1) | u64::from(bit);
        }
        value
    }

    /// Packs the bits back into bytes. A trailing partial byte is padded
    /// with zero bits on the right.
    pub fn to_bytes(&self) -> Vec<u8> {
        (0..self.bits.len().div_ceil(8))
            .map(|i| self.read_bits(i * 8, 8) as u8)
            .collect()
    }
}

/// Converts an ASCII-binary datagram into the bytes it spells out.
///
/// Returns `None` if the datagram isn't ASCII binary.
pub fn pack_ascii_binary(buf: &[u8]) -> Option<Vec<u8>> {
    BitView::from_ascii(buf).map(|view| view.to_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_big_endian_reads() {
        let buf = [0x12, 0x34, 0x56, 0x78, 0xFF, 0xFE];
        let r = WireReader::new(&buf);
        assert_eq!(r.u8(0), 0x12);
        assert_eq!(r.u16_be(0), 0x1234);
        assert_eq!(r.u32_be(0), 0x1234_5678);
        assert_eq!(r.i16_be(4), -2);
        assert_eq!(r.i32_be(2), 0x5678_FFFEu32 as i32);
    }

    #[test]
    fn test_reader_out_of_bounds_returns_zero() {
        let buf = [1, 2, 3];
        let r = WireReader::new(&buf);
        assert_eq!(r.u32_be(0), 0);
        assert_eq!(r.u16_be(2), 0);
        assert_eq!(r.u8(3), 0);
        assert_eq!(r.i32_be(usize::MAX), 0);
        assert_eq!(r.f32_be(1), 0.0);
    }

    #[test]
    fn test_reader_has_rejects_overflowing_offset() {
        let r = WireReader::new(&[0; 8]);
        assert!(r.has(4, 4));
        assert!(!r.has(5, 4));
        assert!(!r.has(usize::MAX, 2));
    }

    #[test]
    fn test_fixed_str_drops_nul_padding() {
        let buf = *b"VIPER\0";
        assert_eq!(WireReader::new(&buf).fixed_str(0, 6), "VIPER");
    }

    #[test]
    fn test_fixed_str_drops_interior_nuls_and_trims() {
        let buf = [b' ', b'A', 0, b'B', b' ', 0];
        assert_eq!(WireReader::new(&buf).fixed_str(0, 6), "AB");
    }

    #[test]
    fn test_fixed_str_truncated_uses_available_prefix() {
        let buf = *b"EAG";
        assert_eq!(WireReader::new(&buf).fixed_str(0, 6), "EAG");
        assert_eq!(WireReader::new(&buf).fixed_str(10, 6), "");
    }

    #[test]
    fn test_cursor_advances_per_field() {
        let buf = [0x00, 0x01, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x2A];
        let mut c = Cursor::new(&buf, 0);
        assert_eq!(c.take_u16(), 1);
        assert_eq!(c.take_i16(), -1);
        assert_eq!(c.take_u32(), 42);
        assert_eq!(c.pos(), 8);
        assert_eq!(c.remaining(), 0);
        assert!(!c.has(1));
    }

    #[test]
    fn test_bit_view_reads_across_byte_boundary() {
        let view = BitView::from_bytes(&[0b1010_1100, 0b0101_0000]);
        assert_eq!(view.len(), 16);
        assert_eq!(view.read_bits(0, 4), 0b1010);
        assert_eq!(view.read_bits(4, 8), 0b1100_0101);
    }

    #[test]
    fn test_bit_view_overflow_pads_with_zeros() {
        let view = BitView::from_bytes(&[0b0000_0011]);
        // Two available bits "11" followed by two padded zeros.
        assert_eq!(view.read_bits(6, 4), 0b1100);
        assert_eq!(view.read_bits(8, 4), 0);
    }

    #[test]
    fn test_from_ascii_accepts_only_binary_digits() {
        assert!(BitView::from_ascii(b"0101\n").is_some());
        assert!(BitView::from_ascii(b"0102").is_none());
        assert!(BitView::from_ascii(b"   ").is_none());
    }

    #[test]
    fn test_pack_ascii_binary_spells_bytes() {
        let packed = pack_ascii_binary(b"0000000001100101").unwrap();
        assert_eq!(packed, vec![0x00, 0x65]);
    }

    #[test]
    fn test_pack_ascii_binary_pads_partial_byte() {
        assert_eq!(pack_ascii_binary(b"1").unwrap(), vec![0x80]);
    }
}
