use std::mem::{ManuallyDrop, MaybeUninit};

use rayon::prelude::*;

use crate::error::MapError;

/// Uninitialized storage for one result per input index. Written slots are
/// dropped with the buffer unless moved out through `into_vec`.
pub struct OutputBuffer<T> {
    slots: Vec<MaybeUninit<T>>,
    written: Vec<bool>,
}

pub struct Slot<'a, T> {
    value: &'a mut MaybeUninit<T>,
    written: &'a mut bool,
}

impl<T> Slot<'_, T> {
    #[inline]
    pub fn write(self, item: T) {
        self.value.write(item);
        *self.written = true;
    }
}

impl<T> OutputBuffer<T> {
    pub fn new(len: usize) -> Self {
        Self::from_parts(Vec::with_capacity(len), Vec::with_capacity(len), len)
    }

    pub fn try_new(len: usize) -> Result<Self, MapError> {
        let mut slots = Vec::new();
        let mut written = Vec::new();
        slots
            .try_reserve_exact(len)
            .and_then(|_| written.try_reserve_exact(len))
            .map_err(|_| MapError::AllocationFailed { len })?;
        Ok(Self::from_parts(slots, written, len))
    }

    #[inline]
    fn from_parts(mut slots: Vec<MaybeUninit<T>>, mut written: Vec<bool>, len: usize) -> Self {
        slots.resize_with(len, MaybeUninit::uninit);
        written.resize(len, false);
        OutputBuffer { slots, written }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    // Err carries the first unwritten index.
    pub fn into_vec(mut self) -> Result<Vec<T>, usize> {
        if let Some(index) = self.written.iter().position(|written| !written) {
            return Err(index);
        }
        self.written.clear();
        let mut slots = ManuallyDrop::new(std::mem::take(&mut self.slots));
        let (ptr, len, capacity) = (slots.as_mut_ptr(), slots.len(), slots.capacity());
        // SAFETY: all `len` slots are initialized and `MaybeUninit<T>` has
        // the same layout as `T`. The original vector is never dropped.
        Ok(unsafe { Vec::from_raw_parts(ptr.cast::<T>(), len, capacity) })
    }
}

impl<T: Send> OutputBuffer<T> {
    pub fn slots(&mut self) -> impl IndexedParallelIterator<Item = Slot<'_, T>> {
        self.slots
            .par_iter_mut()
            .zip(self.written.par_iter_mut())
            .map(|(value, written)| Slot { value, written })
    }
}

impl<T> Drop for OutputBuffer<T> {
    fn drop(&mut self) {
        for (slot, written) in self.slots.iter_mut().zip(&self.written) {
            if *written {
                // SAFETY: the slot was initialized by `Slot::write` and the
                // buffer still owns it.
                unsafe { slot.assume_init_drop() };
            }
        }
    }
}
