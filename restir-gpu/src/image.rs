use glam::{UVec2, Vec4};

/// Read-only view into a screen-sized image, one [`Vec4`] per texel; CPU
/// counterpart of `texture_2d<f32>` + `textureLoad()`.
#[derive(Clone, Copy, Debug)]
pub struct Image<'a> {
    size: UVec2,
    texels: &'a [Vec4],
}

impl<'a> Image<'a> {
    pub fn new(size: UVec2, texels: &'a [Vec4]) -> Self {
        assert_eq!((size.x * size.y) as usize, texels.len());

        Self { size, texels }
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn load(&self, pos: UVec2) -> Vec4 {
        self.texels[(pos.y * self.size.x + pos.x) as usize]
    }
}

/// Write-only view into a screen-sized image; CPU counterpart of
/// `texture_storage_2d<_, write>` + `textureStore()`.
#[derive(Debug)]
pub struct ImageMut<'a> {
    size: UVec2,
    texels: &'a mut [Vec4],
}

impl<'a> ImageMut<'a> {
    pub fn new(size: UVec2, texels: &'a mut [Vec4]) -> Self {
        assert_eq!((size.x * size.y) as usize, texels.len());

        Self { size, texels }
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn store(&mut self, pos: UVec2, value: Vec4) {
        self.texels[(pos.y * self.size.x + pos.x) as usize] = value;
    }
}

#[cfg(test)]
mod tests {
    use glam::uvec2;

    use super::*;

    #[test]
    fn load_and_store_use_row_major_layout() {
        let mut texels = vec![Vec4::ZERO; 6];

        ImageMut::new(uvec2(3, 2), &mut texels).store(uvec2(2, 1), Vec4::ONE);

        assert_eq!(Vec4::ONE, texels[5]);
        assert_eq!(Vec4::ONE, Image::new(uvec2(3, 2), &texels).load(uvec2(2, 1)));
    }
}
