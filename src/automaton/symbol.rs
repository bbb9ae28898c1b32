//! The fixed ten-symbol digit alphabet.
//!
//! Every automaton in this crate reads decimal digits and nothing else.
//! [`Digit`] is a single symbol; [`DigitSet`] is a compact set of symbols
//! used for prefix constraints and for grouping edges when deriving a
//! regular expression.

use std::fmt;
use std::ops::RangeInclusive;

/// A single decimal digit symbol (`'0'`..=`'9'`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u8", into = "u8")
)]
pub struct Digit(u8);

impl Digit {
    /// The complete alphabet in ascending order.
    pub const ALL: [Digit; 10] = [
        Digit(0),
        Digit(1),
        Digit(2),
        Digit(3),
        Digit(4),
        Digit(5),
        Digit(6),
        Digit(7),
        Digit(8),
        Digit(9),
    ];

    /// Create a digit from its numeric value.
    ///
    /// Returns `None` if `value > 9`.
    pub const fn new(value: u8) -> Option<Self> {
        if value <= 9 {
            Some(Digit(value))
        } else {
            None
        }
    }

    /// Parse a digit character.
    ///
    /// Only the ASCII digits are accepted; anything else returns `None`.
    pub fn from_char(c: char) -> Option<Self> {
        c.to_digit(10).map(|v| Digit(v as u8))
    }

    /// Numeric value of this digit.
    #[inline]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// The character for this digit.
    #[inline]
    pub const fn as_char(self) -> char {
        (b'0' + self.0) as char
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.as_char(), f)
    }
}

impl TryFrom<u8> for Digit {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Digit::new(value).ok_or_else(|| format!("{} is not a decimal digit", value))
    }
}

impl From<Digit> for u8 {
    fn from(digit: Digit) -> Self {
        digit.0
    }
}

/// A set of digits, stored as a 10-bit mask.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "Vec<Digit>", into = "Vec<Digit>")
)]
pub struct DigitSet(u16);

impl DigitSet {
    const FULL: u16 = 0b11_1111_1111;

    /// The empty set.
    pub const fn empty() -> Self {
        DigitSet(0)
    }

    /// The full alphabet.
    pub const fn all() -> Self {
        DigitSet(Self::FULL)
    }

    /// A set containing exactly one digit.
    pub const fn only(digit: Digit) -> Self {
        DigitSet(1 << digit.0)
    }

    /// All digits in `range`; values above 9 are ignored.
    pub fn range(range: RangeInclusive<u8>) -> Self {
        range.filter_map(Digit::new).collect()
    }

    /// Check membership.
    #[inline]
    pub const fn contains(self, digit: Digit) -> bool {
        self.0 & (1 << digit.0) != 0
    }

    /// Add a digit to the set.
    pub fn insert(&mut self, digit: Digit) {
        self.0 |= 1 << digit.0;
    }

    /// Set union.
    pub const fn union(self, other: DigitSet) -> Self {
        DigitSet(self.0 | other.0)
    }

    /// Number of digits in the set.
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Check if the set is empty.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Check if the set is the whole alphabet.
    pub const fn is_full(self) -> bool {
        self.0 == Self::FULL
    }

    /// Iterate over members in ascending order.
    pub fn iter(self) -> impl Iterator<Item = Digit> {
        Digit::ALL.into_iter().filter(move |d| self.contains(*d))
    }
}

impl FromIterator<Digit> for DigitSet {
    fn from_iter<I: IntoIterator<Item = Digit>>(iter: I) -> Self {
        let mut set = DigitSet::empty();
        for digit in iter {
            set.insert(digit);
        }
        set
    }
}

impl From<Vec<Digit>> for DigitSet {
    fn from(digits: Vec<Digit>) -> Self {
        digits.into_iter().collect()
    }
}

impl From<DigitSet> for Vec<Digit> {
    fn from(set: DigitSet) -> Self {
        set.iter().collect()
    }
}

impl fmt::Debug for DigitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DigitSet({})", self)
    }
}

/// Renders as a regex character class: `5`, `[1-5]`, `[0-9]`, `[13579]`.
impl fmt::Display for DigitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "[]");
        }
        if self.len() == 1 {
            if let Some(d) = self.iter().next() {
                return write!(f, "{}", d);
            }
        }

        write!(f, "[")?;
        let digits: Vec<u8> = self.iter().map(Digit::value).collect();
        let mut i = 0;
        while i < digits.len() {
            let start = digits[i];
            let mut end = start;
            while i + 1 < digits.len() && digits[i + 1] == end + 1 {
                end += 1;
                i += 1;
            }
            // Runs of three or more collapse into a range
            match end - start {
                0 => write!(f, "{}", start)?,
                1 => write!(f, "{}{}", start, end)?,
                _ => write!(f, "{}-{}", start, end)?,
            }
            i += 1;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(v: u8) -> Digit {
        Digit::new(v).unwrap()
    }

    #[test]
    fn test_digit_bounds() {
        assert!(Digit::new(9).is_some());
        assert!(Digit::new(10).is_none());
        assert_eq!(Digit::from_char('7'), Some(d(7)));
        assert_eq!(Digit::from_char('a'), None);
        assert_eq!(Digit::from_char('٣'), None); // Arabic-Indic three
        assert_eq!(d(4).as_char(), '4');
    }

    #[test]
    fn test_alphabet_is_ascending() {
        for (i, digit) in Digit::ALL.iter().enumerate() {
            assert_eq!(digit.value() as usize, i);
        }
    }

    #[test]
    fn test_digit_set_operations() {
        let mut set = DigitSet::range(1..=5);
        assert_eq!(set.len(), 5);
        assert!(!set.contains(d(0)));
        assert!(set.contains(d(5)));
        assert!(!set.contains(d(6)));

        set.insert(d(9));
        assert_eq!(set.iter().map(Digit::value).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5, 9]);

        assert!(DigitSet::empty().is_empty());
        assert!(DigitSet::all().is_full());
        assert_eq!(DigitSet::range(0..=20), DigitSet::all());
        assert_eq!(DigitSet::only(d(3)).union(DigitSet::only(d(4))), DigitSet::range(3..=4));
    }

    #[test]
    fn test_digit_set_display() {
        assert_eq!(DigitSet::only(d(5)).to_string(), "5");
        assert_eq!(DigitSet::range(1..=5).to_string(), "[1-5]");
        assert_eq!(DigitSet::all().to_string(), "[0-9]");
        assert_eq!(DigitSet::range(7..=8).to_string(), "[78]");
        assert_eq!(DigitSet::empty().to_string(), "[]");

        let odd: DigitSet = [1, 3, 5, 7, 9].into_iter().map(d).collect();
        assert_eq!(odd.to_string(), "[13579]");

        let mixed: DigitSet = [0, 1, 2, 5, 7, 8, 9].into_iter().map(d).collect();
        assert_eq!(mixed.to_string(), "[0-257-9]");
    }
}
