use std::fmt;

pub const N_CLASSES: usize = 6;

/// Display colours (merqury palette), one per score class
pub const CLASS_COLOURS: [&str; N_CLASSES] = [
    "0,0,0",       // gray
    "228,26,28",   // red
    "55,126,184",  // blue
    "77,175,74",   // green
    "152,78,163",  // purple
    "255,127,0",   // orange
];

/// Multiplicity class in 0..=5, where 5 stands for "5 or more"
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ScoreClass(u8);

impl ScoreClass {
    pub const MAX: Self = Self(N_CLASSES as u8 - 1);

    #[inline]
    pub fn clamped(raw: u64) -> Self {
        if raw >= Self::MAX.0 as u64 {
            Self::MAX
        } else {
            Self(raw as u8)
        }
    }

    /// Returns None for values outside 0..=5
    #[inline]
    pub fn from_index(ix: usize) -> Option<Self> {
        if ix < N_CLASSES {
            Some(Self(ix as u8))
        } else {
            None
        }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn colour(&self) -> &'static str {
        CLASS_COLOURS[self.index()]
    }
}

impl fmt::Display for ScoreClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn clamp() {
        for raw in 0..5 {
            assert_eq!(ScoreClass::clamped(raw).index(), raw as usize);
        }
        assert_eq!(ScoreClass::clamped(5), ScoreClass::MAX);
        assert_eq!(ScoreClass::clamped(6), ScoreClass::MAX);
        assert_eq!(ScoreClass::clamped(u64::MAX), ScoreClass::MAX);
    }

    #[test]
    fn colours() {
        assert_eq!(ScoreClass::clamped(0).colour(), "0,0,0");
        assert_eq!(ScoreClass::clamped(2).colour(), "55,126,184");
        assert_eq!(ScoreClass::clamped(9).colour(), "255,127,0");
        assert!(ScoreClass::from_index(6).is_none());
    }
}
