/// One detector-reported face region in normalized image coordinates.
///
/// Extents live in `[0, 1]` relative to the detector's image frame. The
/// constructor clamps out-of-range values and orders inverted extents so
/// downstream math can rely on `min <= max`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Observation {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Observation {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        let (min_x, max_x) = ordered(clamp_unit(min_x), clamp_unit(max_x));
        let (min_y, max_y) = ordered(clamp_unit(min_y), clamp_unit(max_y));
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn min_x(&self) -> f64 {
        self.min_x
    }

    pub fn min_y(&self) -> f64 {
        self.min_y
    }

    pub fn max_x(&self) -> f64 {
        self.max_x
    }

    pub fn max_y(&self) -> f64 {
        self.max_y
    }

    pub fn mid_x(&self) -> f64 {
        (self.min_x + self.max_x) / 2.0
    }

    pub fn mid_y(&self) -> f64 {
        (self.min_y + self.max_y) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

fn clamp_unit(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
