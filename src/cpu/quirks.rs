// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Per-behavior switches between the original interpreter and later ones

/// Selects how the register-to-register ALU ops treat `vF` and `vY`.
///
/// A field left `false` behaves like the interpreter on the COSMAC VIP.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quirks {
    /// `8xy1`, `8xy2` and `8xy3` leave `vF` alone instead of zeroing it
    pub bin_ops: bool,
    /// `8xy6` and `8xyE` shift `vX` itself instead of reading `vY`
    pub shift: bool,
}

impl From<bool> for Quirks {
    /// Turns every switch to `all`
    fn from(all: bool) -> Self {
        Self {
            bin_ops: all,
            shift: all,
        }
    }
}
