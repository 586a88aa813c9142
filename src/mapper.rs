use std::{
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};

use log::{debug, trace};
use rayon::prelude::*;

use crate::{
    error::MapError,
    utils::{buffer::OutputBuffer, panic::Failure},
};

/// Maps slices in parallel, writing every result straight into its slot of
/// the output. Runs on rayon's global pool unless built with a dedicated one.
#[derive(Clone)]
pub struct ParallelMapper {
    pool: Option<Arc<rayon::ThreadPool>>,
    min_len: usize,
}

impl Default for ParallelMapper {
    fn default() -> Self {
        ParallelMapper {
            pool: None,
            min_len: 1,
        }
    }
}

#[derive(Default)]
pub struct ParallelMapperBuilder {
    num_threads: Option<usize>,
    thread_name: Option<String>,
    min_len: Option<usize>,
}

impl ParallelMapperBuilder {
    /// Zero lets rayon pick the hardware concurrency.
    pub fn num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = Some(num_threads);
        self
    }

    pub fn thread_name(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name = Some(prefix.into());
        self
    }

    pub fn min_len(mut self, min_len: usize) -> Self {
        self.min_len = Some(min_len.max(1));
        self
    }

    pub fn build(self) -> Result<ParallelMapper, MapError> {
        let min_len = self.min_len.unwrap_or(1);
        if self.num_threads.is_none() && self.thread_name.is_none() {
            return Ok(ParallelMapper { pool: None, min_len });
        }
        let mut builder =
            rayon::ThreadPoolBuilder::new().num_threads(self.num_threads.unwrap_or(0));
        if let Some(prefix) = self.thread_name {
            builder = builder.thread_name(move |i| format!("{}-{}", prefix, i));
        }
        let pool = builder.build()?;
        Ok(ParallelMapper {
            pool: Some(Arc::new(pool)),
            min_len,
        })
    }
}

impl ParallelMapper {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn builder() -> ParallelMapperBuilder {
        ParallelMapperBuilder::default()
    }

    pub fn with_threads(num_threads: usize) -> Result<Self, MapError> {
        Self::builder().num_threads(num_threads).build()
    }

    pub fn current_num_threads(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    /// Returns `transform` applied to every element of `input`, in input
    /// order. If a transform panics, the panic of the lowest failing index
    /// resumes on the calling thread once every other element is done.
    pub fn map<E, T, F>(&self, input: &[E], transform: F) -> Vec<T>
    where
        E: Sync,
        T: Send,
        F: Fn(&E) -> T + Sync,
    {
        if input.is_empty() {
            return Vec::new();
        }
        let buffer = OutputBuffer::new(input.len());
        match self.run(input, buffer, &transform) {
            Ok(output) => output,
            Err(failure) => failure.resume(),
        }
    }

    /// Like [`ParallelMapper::map`], but reports a failed allocation or a
    /// panicking transform as a [`MapError`] instead of unwinding.
    pub fn try_map<E, T, F>(&self, input: &[E], transform: F) -> Result<Vec<T>, MapError>
    where
        E: Sync,
        T: Send,
        F: Fn(&E) -> T + Sync,
    {
        if input.is_empty() {
            return Ok(Vec::new());
        }
        let buffer = OutputBuffer::try_new(input.len()).inspect_err(|e| debug!("{}", e))?;
        self.run(input, buffer, &transform).map_err(Failure::into_error)
    }

    fn run<E, T, F>(
        &self,
        input: &[E],
        mut buffer: OutputBuffer<T>,
        transform: &F,
    ) -> Result<Vec<T>, Failure>
    where
        E: Sync,
        T: Send,
        F: Fn(&E) -> T + Sync,
    {
        trace!(
            "Dispatching {} units over {} threads",
            buffer.len(),
            self.current_num_threads()
        );
        let min_len = self.min_len;
        let failure = self.install(|| {
            input
                .par_iter()
                .zip(buffer.slots())
                .enumerate()
                .with_min_len(min_len)
                .filter_map(|(index, (item, slot))| {
                    match panic::catch_unwind(AssertUnwindSafe(|| transform(item))) {
                        Ok(value) => {
                            slot.write(value);
                            None
                        }
                        Err(payload) => Some(Failure::new(index, payload)),
                    }
                })
                .min_by_key(|failure| failure.index)
        });
        if let Some(failure) = failure {
            debug!(
                "Transform panicked at index {}: {}",
                failure.index,
                failure.message()
            );
            return Err(failure);
        }
        match buffer.into_vec() {
            Ok(output) => Ok(output),
            // Every unit either writes its slot or reports a failure.
            Err(index) => unreachable!("slot {} was never written", index),
        }
    }

    #[inline]
    fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }

    #[cfg(feature = "future")]
    #[inline]
    pub(crate) fn spawn<OP>(&self, op: OP)
    where
        OP: FnOnce() + Send + 'static,
    {
        match &self.pool {
            Some(pool) => pool.spawn(op),
            None => rayon::spawn(op),
        }
    }
}
