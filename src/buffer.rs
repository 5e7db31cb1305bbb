//! A fixed-capacity scratch sequence of [`BoundedQuadratic`] pieces.
//!
//! Used as the envelope engine's three-slot bridge workspace and as its
//! `2n`-capacity output buffer, so that the envelope's inner loop never
//! allocates.

use crate::bounded_quadratic::BoundedQuadratic;

/// A scratch buffer of `BoundedQuadratic` with a fixed capacity and an
/// explicit live-length cursor.
pub struct Buffer {
    capacity: usize,
    data: Vec<BoundedQuadratic>,
}

impl Buffer {
    /// Allocates a buffer that can hold up to `capacity` pieces.
    pub fn with_capacity(capacity: usize) -> Buffer {
        Buffer {
            capacity,
            data: Vec::with_capacity(capacity),
        }
    }

    /// Current number of live pieces.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true iff no pieces are live.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The buffer's declared capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Appends `piece`.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is already at capacity — a workspace-size
    /// mismatch is a precondition violation, not a representable state.
    pub fn push(&mut self, piece: BoundedQuadratic) {
        assert!(
            self.data.len() < self.capacity,
            "Buffer push exceeds declared capacity"
        );
        self.data.push(piece);
    }

    /// Removes and returns the last piece, if any.
    pub fn pop(&mut self) -> Option<BoundedQuadratic> {
        self.data.pop()
    }

    /// Returns the piece at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn get(&self, index: usize) -> BoundedQuadratic {
        self.data[index]
    }

    /// Overwrites the piece at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn set(&mut self, index: usize, piece: BoundedQuadratic) {
        self.data[index] = piece;
    }

    /// Appends every piece in `other`, in order.
    ///
    /// # Panics
    ///
    /// Panics if the combined length would exceed capacity.
    pub fn append_from(&mut self, other: &[BoundedQuadratic]) {
        assert!(
            self.data.len() + other.len() <= self.capacity,
            "Buffer append_from exceeds declared capacity"
        );
        self.data.extend_from_slice(other);
    }

    /// Empties the buffer without changing its capacity.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Read-only view of the live pieces, in order.
    pub fn as_slice(&self) -> &[BoundedQuadratic] {
        &self.data
    }

    /// Reverses the buffer in place: swaps pieces into mirrored
    /// positions and also reverses each piece itself (`f(x) -> f(-x)`),
    /// matching the envelope's mirror-case trick of reversing both the
    /// piece order and each piece's domain orientation.
    pub fn reverse_mut(&mut self) {
        let n = self.data.len();
        for i in 0..n / 2 {
            self.data.swap(i, n - 1 - i);
        }
        for piece in self.data.iter_mut() {
            *piece = piece.reverse();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_respects_order() {
        let mut buf = Buffer::with_capacity(3);
        buf.push(BoundedQuadratic::new(0.0, 1.0, 0.0, 0.0, 1.0));
        buf.push(BoundedQuadratic::new(1.0, 2.0, 0.0, 0.0, 2.0));
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.pop().unwrap().r, 2.0);
        assert_eq!(buf.len(), 1);
    }

    #[test]
    #[should_panic]
    fn push_past_capacity_panics() {
        let mut buf = Buffer::with_capacity(1);
        buf.push(BoundedQuadratic::new(0.0, 1.0, 0.0, 0.0, 0.0));
        buf.push(BoundedQuadratic::new(1.0, 2.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn get_set_roundtrip() {
        let mut buf = Buffer::with_capacity(2);
        buf.push(BoundedQuadratic::new(0.0, 1.0, 0.0, 0.0, 1.0));
        buf.set(0, BoundedQuadratic::new(0.0, 1.0, 0.0, 0.0, 9.0));
        assert_eq!(buf.get(0).r, 9.0);
    }

    #[test]
    fn reverse_mut_swaps_and_mirrors_pieces() {
        let mut buf = Buffer::with_capacity(2);
        buf.push(BoundedQuadratic::new(0.0, 1.0, 1.0, 0.0, 0.0));
        buf.push(BoundedQuadratic::new(1.0, 2.0, 0.0, 1.0, 0.0));
        buf.reverse_mut();
        assert_eq!(buf.len(), 2);
        // order swapped, and each piece's domain mirrored.
        assert_eq!(buf.get(0), BoundedQuadratic::new(-2.0, -1.0, 0.0, -1.0, 0.0));
        assert_eq!(buf.get(1), BoundedQuadratic::new(-1.0, 0.0, 1.0, 0.0, 0.0));
    }

    #[test]
    fn append_from_extends_in_order() {
        let mut buf = Buffer::with_capacity(4);
        buf.push(BoundedQuadratic::new(0.0, 1.0, 0.0, 0.0, 1.0));
        buf.append_from(&[
            BoundedQuadratic::new(1.0, 2.0, 0.0, 0.0, 2.0),
            BoundedQuadratic::new(2.0, 3.0, 0.0, 0.0, 3.0),
        ]);
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.get(2).r, 3.0);
    }
}
