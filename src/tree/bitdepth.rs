//! Detector bitdepth and its dataset type code.

use std::fmt;
use std::str::FromStr;

use crate::tree::TreeError;

/// Supported detector bitdepths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bitdepth {
    One,
    Six,
    Twelve,
    TwentyFour,
}

impl Bitdepth {
    /// Number of bits per pixel.
    pub fn bits(self) -> u32 {
        match self {
            Bitdepth::One => 1,
            Bitdepth::Six => 6,
            Bitdepth::Twelve => 12,
            Bitdepth::TwentyFour => 24,
        }
    }

    /// Numeric dataset type code written to `hdf.dataset.data.datatype`.
    pub fn datatype(self) -> u8 {
        match self {
            Bitdepth::One | Bitdepth::Six => 0,
            Bitdepth::Twelve => 1,
            Bitdepth::TwentyFour => 2,
        }
    }
}

impl TryFrom<u32> for Bitdepth {
    type Error = TreeError;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        match bits {
            1 => Ok(Bitdepth::One),
            6 => Ok(Bitdepth::Six),
            12 => Ok(Bitdepth::Twelve),
            24 => Ok(Bitdepth::TwentyFour),
            other => Err(TreeError::InvalidBitdepth(other)),
        }
    }
}

impl FromStr for Bitdepth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bits: u32 = s
            .parse()
            .map_err(|_| format!("'{}' is not a number", s))?;
        Bitdepth::try_from(bits).map_err(|e| e.to_string())
    }
}

/// Renders as the `"{bits}-bit"` string the targets expect.
impl fmt::Display for Bitdepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}
