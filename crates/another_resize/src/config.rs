/// Knobs of a [`Resizer`](crate::Resizer).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeConfig {
    /// Multiplies the kernel support: values below 1 sharpen, above 1 soften.
    pub blur: f64,
    /// Worker threads per pass, at most one per logical CPU; `None` uses
    /// all of them.
    pub workers: Option<usize>,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            blur: 1.0,
            workers: None,
        }
    }
}

impl ResizeConfig {
    pub fn with_blur(mut self, blur: f64) -> Self {
        self.blur = blur;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub(crate) fn worker_count(&self) -> usize {
        let cpus = num_cpus::get().max(1);
        self.workers.map_or(cpus, |w| w.clamp(1, cpus))
    }
}
