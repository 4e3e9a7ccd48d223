// Splits a destination buffer into horizontal strips and runs one task per
// strip on a rayon pool.

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::buffer::PixelBuffer;
use crate::error::ResizeResult;

/// Exclusive view of a contiguous range of destination rows.
#[derive(Debug)]
pub struct Strip<'a> {
    /// Index of the first row, counted from the top of the buffer.
    pub first_row: usize,
    pub rows: usize,
    pub stride: usize,
    pub data: &'a mut [u8],
}

impl Strip<'_> {
    /// Mutable bytes of row `r` relative to the strip.
    #[inline]
    pub fn row_mut(&mut self, r: usize) -> &mut [u8] {
        let start = r * self.stride;
        let end = (start + self.stride).min(self.data.len());
        &mut self.data[start..end]
    }
}

/// Fixed-size worker pool that fans a pass out over `workers` strips.
#[derive(Debug)]
pub struct Dispatcher {
    pool: ThreadPool,
    workers: usize,
}

impl Dispatcher {
    pub fn new(workers: usize) -> ResizeResult<Self> {
        let workers = workers.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("resize-worker-{i}"))
            .build()?;
        Ok(Self { pool, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Runs `job` once per strip of `out` and waits for all of them.
    ///
    /// No task is cancelled when another one fails; the first failure in
    /// strip order is returned once every task has finished.
    ///
    /// __Arguments:__
    ///
    /// + `out` - destination buffer, split into `workers` row ranges
    ///   (some may be empty when the buffer has fewer rows than workers)
    ///
    /// + `job` - per-strip work; it must only write into its strip
    ///
    pub fn run<F>(&self, out: &mut PixelBuffer, job: F) -> ResizeResult<()>
    where
        F: Fn(Strip<'_>) -> ResizeResult<()> + Sync,
    {
        let strips = split_rows(out, self.workers);
        let mut outcomes: Vec<ResizeResult<()>> = strips.iter().map(|_| Ok(())).collect();

        let job = &job;
        self.pool.scope(|scope| {
            for (strip, outcome) in strips.into_iter().zip(outcomes.iter_mut()) {
                scope.spawn(move |_| {
                    log::trace!(
                        "strip rows {}..{}",
                        strip.first_row,
                        strip.first_row + strip.rows
                    );
                    *outcome = job(strip);
                });
            }
        });

        outcomes.into_iter().collect()
    }
}

/// Row range `[i*h/n, (i+1)*h/n)` for every `i < n`.
fn split_rows(out: &mut PixelBuffer, n: usize) -> Vec<Strip<'_>> {
    let height = out.height();
    let stride = out.stride;
    let mut rest: &mut [u8] = &mut out.samples;
    let mut strips = Vec::with_capacity(n);

    for i in 0..n {
        let first_row = i * height / n;
        let end_row = (i + 1) * height / n;
        let rows = end_row - first_row;

        let bytes = if end_row == height {
            rest.len()
        } else {
            rows * stride
        };
        let (head, tail) = std::mem::take(&mut rest).split_at_mut(bytes);
        rest = tail;

        strips.push(Strip {
            first_row,
            rows,
            stride,
            data: head,
        });
    }

    strips
}
