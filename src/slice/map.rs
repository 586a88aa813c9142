use crate::{error::MapError, mapper::ParallelMapper};

pub trait ParallelMap<E> {
    /// Transforms every element on rayon's global pool and collects the
    /// results in input order.
    fn par_map<F, T>(&self, map_op: F) -> Vec<T>
    where
        F: Fn(&E) -> T + Sync,
        T: Send;

    fn try_par_map<F, T>(&self, map_op: F) -> Result<Vec<T>, MapError>
    where
        F: Fn(&E) -> T + Sync,
        T: Send;
}

impl<E: Sync> ParallelMap<E> for [E] {
    #[inline]
    fn par_map<F, T>(&self, map_op: F) -> Vec<T>
    where
        F: Fn(&E) -> T + Sync,
        T: Send,
    {
        ParallelMapper::default().map(self, map_op)
    }

    #[inline]
    fn try_par_map<F, T>(&self, map_op: F) -> Result<Vec<T>, MapError>
    where
        F: Fn(&E) -> T + Sync,
        T: Send,
    {
        ParallelMapper::default().try_map(self, map_op)
    }
}
