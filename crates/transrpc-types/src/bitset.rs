//! Bit-indexed sets decoded from the daemon's piece and file maps.

/// A growable set of bit indices.
///
/// Stored packed, most significant bit first within each byte, which is the layout the daemon
/// uses for the base64-encoded `pieces` field. Equality compares the set bits only, so a set
/// decoded from a padded byte string equals one decoded from an exact-length bit array.
#[derive(Debug, Clone, Default)]
pub struct Bitset {
    bytes: Vec<u8>,
    len: usize,
}

impl Bitset {
    /// An empty bitset.
    pub const fn new() -> Self {
        Self {
            bytes: Vec::new(),
            len: 0,
        }
    }

    /// Wraps packed bytes, MSB first. The length covers every bit of every byte.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let len = bytes.len() * 8;
        Self { bytes, len }
    }

    /// The packed bytes, MSB first, with trailing bits of the last byte cleared.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    /// Number of addressable bits.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` when no bits are addressable.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether bit `index` is set. Out-of-range indices read as unset.
    pub fn get(&self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        self.bytes[index / 8] & Self::mask(index) != 0
    }

    /// Sets or clears bit `index`, growing the set if needed.
    pub fn set(&mut self, index: usize, value: bool) {
        if index >= self.len {
            self.len = index + 1;
            self.bytes.resize(self.len.div_ceil(8), 0);
        }
        let byte = &mut self.bytes[index / 8];
        if value {
            *byte |= Self::mask(index);
        } else {
            *byte &= !Self::mask(index);
        }
    }

    /// Indices of the set bits, ascending.
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(move |index| self.get(*index))
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.bytes.iter().map(|b| b.count_ones() as usize).sum()
    }

    const fn mask(index: usize) -> u8 {
        0x80 >> (index % 8)
    }
}

impl PartialEq for Bitset {
    fn eq(&self, other: &Self) -> bool {
        self.iter_ones().eq(other.iter_ones())
    }
}

impl Eq for Bitset {}

impl FromIterator<bool> for Bitset {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut bitset = Self::new();
        for (index, value) in iter.into_iter().enumerate() {
            bitset.set(index, value);
        }
        bitset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_are_msb_first() {
        let bitset = Bitset::from_bytes(vec![0b1000_0001, 0b0100_0000]);
        assert_eq!(bitset.iter_ones().collect::<Vec<_>>(), vec![0, 7, 9]);
        assert_eq!(bitset.len(), 16);
        assert_eq!(bitset.count_ones(), 3);
    }

    #[test]
    fn set_grows_and_clears() {
        let mut bitset = Bitset::new();
        bitset.set(10, true);
        assert_eq!(bitset.len(), 11);
        assert!(bitset.get(10));
        assert!(!bitset.get(3));
        bitset.set(10, false);
        assert_eq!(bitset.count_ones(), 0);
        assert!(!bitset.get(500));
    }

    #[test]
    fn equality_ignores_padding() {
        let packed = Bitset::from_bytes(vec![0b1010_0000]);
        let exact: Bitset = [true, false, true].into_iter().collect();
        assert_eq!(packed, exact);
        assert_eq!(exact.to_bytes(), vec![0b1010_0000]);
    }
}
