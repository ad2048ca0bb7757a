//! Little-endian cursor codec shared by every packet layout.
use crate::error::DecodeError;

/// A fixed-width value with a little-endian wire representation.
///
/// Implemented for the primitive numeric types, for fixed-size arrays of
/// any `Wire` type, and for every struct that appears in a packet layout.
/// `SIZE` is the exact number of bytes `read` consumes and `write` emits.
pub trait Wire: Sized {
    const SIZE: usize;

    fn read(r: &mut ByteReader<'_>) -> Result<Self, DecodeError>;

    fn write(&self, w: &mut ByteWriter);
}

/// Forward-only reader over a borrowed datagram.
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    #[inline]
    pub fn read<T: Wire>(&mut self) -> Result<T, DecodeError> {
        T::read(self)
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Borrow the next `n` bytes and advance past them.
    pub fn slice(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        let out_of_bounds = DecodeError::OutOfBounds {
            offset: self.pos,
            width: n,
        };
        let end = self.pos.checked_add(n).ok_or(out_of_bounds.clone())?;
        let bytes = self.data.get(self.pos..end).ok_or(out_of_bounds)?;
        self.pos = end;
        Ok(bytes)
    }

    #[inline]
    fn take<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.slice(N)?);
        Ok(out)
    }
}

/// Growable little-endian writer, the inverse of [`ByteReader`].
#[derive(Debug, Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn put<T: Wire>(&mut self, value: &T) {
        value.write(self);
    }

    pub fn bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

macro_rules! impl_wire_le {
    ($($t:ty),* $(,)?) => {
        $(
            impl Wire for $t {
                const SIZE: usize = std::mem::size_of::<$t>();

                #[inline]
                fn read(r: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
                    r.take::<{ std::mem::size_of::<$t>() }>().map(<$t>::from_le_bytes)
                }

                #[inline]
                fn write(&self, w: &mut ByteWriter) {
                    w.bytes(&self.to_le_bytes());
                }
            }
        )*
    };
}

impl_wire_le!(u8, i8, u16, i16, u32, u64, f32, f64);

impl<T: Wire, const N: usize> Wire for [T; N] {
    const SIZE: usize = T::SIZE * N;

    fn read(r: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let start = r.position();
        let items = (0..N).map(|_| T::read(r)).collect::<Result<Vec<T>, _>>()?;
        items.try_into().map_err(|_| DecodeError::OutOfBounds {
            offset: start,
            width: Self::SIZE,
        })
    }

    fn write(&self, w: &mut ByteWriter) {
        for item in self {
            item.write(w);
        }
    }
}

/// Width of the fixed, NUL-terminated UTF-8 name fields.
pub const NAME_LEN: usize = 48;

/// Decode a fixed-width name up to its first NUL. Invalid UTF-8 is replaced.
pub fn name_from_bytes(raw: &[u8; NAME_LEN]) -> String {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(NAME_LEN);
    String::from_utf8_lossy(raw.get(..end).unwrap_or_default()).into_owned()
}

/// Encode a name into a fixed-width field, truncating on a character
/// boundary so at least one terminating NUL remains.
pub fn name_to_bytes(name: &str) -> [u8; NAME_LEN] {
    let mut out = [0u8; NAME_LEN];
    let mut end = 0;
    for (idx, ch) in name.char_indices() {
        let next = idx + ch.len_utf8();
        if next >= NAME_LEN {
            break;
        }
        end = next;
    }
    if let (Some(dst), Some(src)) = (out.get_mut(..end), name.as_bytes().get(..end)) {
        dst.copy_from_slice(src);
    }
    out
}
