/// Running (weighted) mean
#[derive(Debug, Clone, Default)]
pub struct Averager {
    pub mean: f64,
    pub weight: f64,
    pub count: u64,
}

impl Averager {
    /// Builds new Averager
    pub fn new() -> Self {
        Self::default()
    }

    /// Push new value into [Averager]
    pub fn add(&mut self, x: f64) {
        self.add_weighted(x, 1.0);
    }

    /// Push new value into [Averager], with given weight.
    /// Non positive weights are ignored.
    pub fn add_weighted(&mut self, x: f64, w: f64) {
        if w <= 0.0 || !w.is_finite() {
            return;
        }
        self.count += 1;
        self.weight += w;
        self.mean += (x - self.mean) * w / self.weight;
    }

    /// Mean value, if at least one value was accepted
    pub fn value(&self) -> Option<f64> {
        if self.count > 0 {
            Some(self.mean)
        } else {
            None
        }
    }
}
