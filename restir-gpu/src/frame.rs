use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Pod, Zeroable,
)]
pub struct Frame(u32);

impl Frame {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// Returns a noise seed for given stage of this frame; stages get
    /// different seeds so that their random streams don't correlate.
    pub fn seed(self, stage: u32) -> u32 {
        self.0.wrapping_mul(0x9e37_79b9) ^ stage.wrapping_mul(0x85eb_ca6b)
    }
}
