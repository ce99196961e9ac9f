#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Px(i32);

impl Px {
    pub const ZERO: Px = Px(0);

    pub fn from_i32(value: i32) -> Px {
        Px(value)
    }

    // Floors, so fractional coordinates always land on the pixel above-left.
    pub fn from_f64(value: f64) -> Px {
        if !value.is_finite() {
            return Px::ZERO;
        }
        let floored = value.floor().clamp(i32::MIN as f64, i32::MAX as f64);
        Px(floored as i32)
    }

    pub fn to_i32(self) -> i32 {
        self.0
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl std::ops::Add for Px {
    type Output = Px;
    fn add(self, rhs: Px) -> Px {
        Px(self.0.saturating_add(rhs.0))
    }
}

impl std::ops::AddAssign for Px {
    fn add_assign(&mut self, rhs: Px) {
        *self = *self + rhs;
    }
}

impl std::ops::Sub for Px {
    type Output = Px;
    fn sub(self, rhs: Px) -> Px {
        Px(self.0.saturating_sub(rhs.0))
    }
}

impl std::ops::Mul<i32> for Px {
    type Output = Px;
    fn mul(self, rhs: i32) -> Px {
        Px(self.0.saturating_mul(rhs))
    }
}

impl std::ops::Mul<f64> for Px {
    type Output = Px;
    fn mul(self, rhs: f64) -> Px {
        Px::from_f64(self.0 as f64 * rhs)
    }
}

impl std::ops::Div<i32> for Px {
    type Output = Px;
    fn div(self, rhs: i32) -> Px {
        // Floor division keeps centering offsets consistent with the
        // flooring used everywhere else in layout. Quotients with no i32
        // value (zero divisor, MIN / -1) collapse to zero.
        match self.0.checked_div_euclid(rhs) {
            Some(value) => Px(value),
            None => Px::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: Px,
    pub height: Px,
}

impl Size {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width: Px::from_i32(width),
            height: Px::from_i32(height),
        }
    }

    pub fn a4() -> Self {
        // 210mm x 297mm at 72px/in, rounded to whole pixels.
        Self::new(595, 842)
    }

    pub fn letter() -> Self {
        // 8.5in x 11in at 72px/in.
        Self::new(612, 792)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: Px,
    pub y: Px,
}

impl Point {
    pub fn new(x: Px, y: Px) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}
