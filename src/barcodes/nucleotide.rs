use strum_macros::{Display, EnumIter};

/// The four bases a read may contain, in alphabetic order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter)]
pub enum Nucleotide {
    A,
    C,
    G,
    T,
}

impl Nucleotide {
    pub const COUNT: usize = 4;

    /// Parses an uppercase base. Anything else, `N` and lowercase included, is rejected.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'A' => Some(Nucleotide::A),
            b'C' => Some(Nucleotide::C),
            b'G' => Some(Nucleotide::G),
            b'T' => Some(Nucleotide::T),
            _ => None,
        }
    }

    pub fn as_byte(self) -> u8 {
        match self {
            Nucleotide::A => b'A',
            Nucleotide::C => b'C',
            Nucleotide::G => b'G',
            Nucleotide::T => b'T',
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}
