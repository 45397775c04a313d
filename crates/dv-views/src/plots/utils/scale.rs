//! Linear and band scales mapping data values into chart space

use dv_core::Extent;

/// Continuous mapping from a numeric domain onto a pixel range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn from_extent(extent: Extent, range: (f64, f64)) -> Self {
        Self::new((extent.min, extent.max), range)
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Map a domain value. A zero-width domain maps everything to the middle of the range.
    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    pub fn invert(&self, position: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if r1 == r0 {
            return (d0 + d1) / 2.0;
        }
        d0 + (position - r0) / (r1 - r0) * (d1 - d0)
    }

    /// Round tick values covering the domain, roughly `count` of them
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = if self.domain.0 <= self.domain.1 {
            self.domain
        } else {
            (self.domain.1, self.domain.0)
        };
        if !lo.is_finite() || !hi.is_finite() || count == 0 {
            return Vec::new();
        }
        if lo == hi {
            return vec![lo];
        }

        let step = tick_step(lo, hi, count);
        let start = (lo / step).ceil() as i64;
        let stop = (hi / step).floor() as i64;
        (start..=stop).map(|i| i as f64 * step).collect()
    }

    /// Spacing between the values `ticks(count)` returns
    pub fn tick_step(&self, count: usize) -> f64 {
        let (lo, hi) = self.domain;
        tick_step(lo.min(hi), lo.max(hi), count.max(1))
    }
}

fn tick_step(lo: f64, hi: f64, count: usize) -> f64 {
    let raw = (hi - lo) / count as f64;
    if raw <= 0.0 || !raw.is_finite() {
        return 1.0;
    }
    let power = raw.log10().floor();
    let base = 10f64.powf(power);
    let error = raw / base;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * base
}

/// Format a tick value with just enough decimals for `step`
pub fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step > 0.0 && step < 1.0 {
        (-step.log10().floor()) as usize
    } else {
        0
    };
    let text = format!("{:.*}", decimals, value);
    // Avoid "-0"
    if text.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
        text.trim_start_matches('-').to_string()
    } else {
        text
    }
}

/// Evenly spaced bands for categorical positions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandScale {
    count: usize,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
}

impl BandScale {
    pub fn new(count: usize, range: (f64, f64)) -> Self {
        Self {
            count,
            range,
            padding_inner: 0.0,
            padding_outer: 0.0,
        }
    }

    pub fn padding_inner(mut self, padding: f64) -> Self {
        self.padding_inner = padding.clamp(0.0, 1.0);
        self
    }

    pub fn padding_outer(mut self, padding: f64) -> Self {
        self.padding_outer = padding.max(0.0);
        self
    }

    fn step(&self) -> f64 {
        let n = self.count as f64;
        let (r0, r1) = self.range;
        (r1 - r0) / (n - self.padding_inner + 2.0 * self.padding_outer).max(1.0)
    }

    pub fn bandwidth(&self) -> f64 {
        self.step() * (1.0 - self.padding_inner)
    }

    /// Start of band `index`, `None` past the end
    pub fn position(&self, index: usize) -> Option<f64> {
        if index >= self.count {
            return None;
        }
        let n = self.count as f64;
        let (r0, r1) = self.range;
        let step = self.step();
        // Bands are centered in the range
        let start = r0 + (r1 - r0 - step * (n - self.padding_inner)) / 2.0;
        Some(start + step * index as f64)
    }

    /// Band containing `position`
    pub fn index_at(&self, position: f64) -> Option<usize> {
        (0..self.count).find(|&i| {
            self.position(i)
                .map(|start| position >= start && position < start + self.bandwidth())
                .unwrap_or(false)
        })
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_map_and_invert() {
        let scale = LinearScale::new((1.0, 5.0), (50.0, 250.0));
        assert_eq!(scale.map(1.0), 50.0);
        assert_eq!(scale.map(5.0), 250.0);
        assert_eq!(scale.map(3.0), 150.0);
        assert_eq!(scale.invert(150.0), 3.0);
    }

    #[test]
    fn test_inverted_range() {
        let scale = LinearScale::new((0.0, 10.0), (460.0, 20.0));
        assert_eq!(scale.map(0.0), 460.0);
        assert_eq!(scale.map(10.0), 20.0);
    }

    #[test]
    fn test_degenerate_domain_maps_to_middle() {
        let scale = LinearScale::new((7.0, 7.0), (0.0, 100.0));
        assert_eq!(scale.map(7.0), 50.0);
        assert_eq!(scale.ticks(5), vec![7.0]);
    }

    #[test]
    fn test_ticks_are_round() {
        let scale = LinearScale::new((0.0, 1.0), (0.0, 1.0));
        let ticks = scale.ticks(5);
        assert_eq!(ticks.len(), 6);
        assert!((ticks[1] - 0.2).abs() < 1e-12);

        let scale = LinearScale::new((1992.0, 2023.0), (0.0, 1.0));
        assert_eq!(scale.ticks(5), vec![1995.0, 2000.0, 2005.0, 2010.0, 2015.0, 2020.0]);
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(0.2, 0.2), "0.2");
        assert_eq!(format_tick(2000.0, 5.0), "2000");
        assert_eq!(format_tick(-0.0, 0.5), "0.0");
        assert_eq!(format_tick(0.05, 0.05), "0.05");
    }

    #[test]
    fn test_band_positions() {
        let scale = BandScale::new(4, (0.0, 400.0));
        assert_eq!(scale.bandwidth(), 100.0);
        assert_eq!(scale.position(0), Some(0.0));
        assert_eq!(scale.position(3), Some(300.0));
        assert_eq!(scale.position(4), None);
        assert_eq!(scale.index_at(250.0), Some(2));

        let padded = BandScale::new(2, (0.0, 190.0)).padding_inner(0.1);
        assert!((padded.bandwidth() - 90.0).abs() < 1e-9);
        assert!(padded.position(0).unwrap_or(f64::NAN).abs() < 1e-9);
        assert!((padded.position(1).unwrap_or_default() - 100.0).abs() < 1e-9);
    }
}
