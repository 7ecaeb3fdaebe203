use glam::UVec2;
use log::debug;

use crate::Bindable;

/// Screen-sized image owned by a camera.
#[derive(Debug)]
pub struct Texture {
    tex: wgpu::Texture,
    view: wgpu::TextureView,
    format: wgpu::TextureFormat,
}

impl Texture {
    pub fn new(
        device: &wgpu::Device,
        label: impl AsRef<str>,
        size: UVec2,
        format: wgpu::TextureFormat,
    ) -> Self {
        let label = label.as_ref();

        debug!("Allocating texture `{label}`; size={size:?}, format={format:?}");

        assert!(size.x > 0);
        assert!(size.y > 0);

        let tex = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: size.x,
                height: size.y,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::STORAGE_BINDING
                | wgpu::TextureUsages::COPY_SRC
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let view = tex.create_view(&Default::default());

        Self { tex, view, format }
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn size(&self) -> UVec2 {
        UVec2::new(self.tex.width(), self.tex.height())
    }

    /// Records a copy of this texture's contents into `target`; both textures
    /// must be of the same size and format.
    pub fn copy_to(&self, encoder: &mut wgpu::CommandEncoder, target: &Self) {
        assert_eq!(self.size(), target.size());
        assert_eq!(self.format, target.format);

        encoder.copy_texture_to_texture(
            self.tex.as_image_copy(),
            target.tex.as_image_copy(),
            self.tex.size(),
        );
    }

    /// Creates an immutable binding available as `texture_2d<f32>` in
    /// shaders.
    pub fn bind_readable(&self) -> impl Bindable + '_ {
        TextureBinder {
            view: &self.view,
            format: self.format,
            writable: false,
        }
    }

    /// Creates a mutable binding available as `texture_storage_2d<_, write>`
    /// in shaders.
    pub fn bind_writable(&self) -> impl Bindable + '_ {
        TextureBinder {
            view: &self.view,
            format: self.format,
            writable: true,
        }
    }
}

pub(crate) struct TextureBinder<'a> {
    pub view: &'a wgpu::TextureView,
    pub format: wgpu::TextureFormat,
    pub writable: bool,
}

impl Bindable for TextureBinder<'_> {
    fn bind(
        &self,
        binding: u32,
    ) -> Vec<(wgpu::BindGroupLayoutEntry, wgpu::BindingResource<'_>)> {
        let ty = if self.writable {
            wgpu::BindingType::StorageTexture {
                access: wgpu::StorageTextureAccess::WriteOnly,
                format: self.format,
                view_dimension: wgpu::TextureViewDimension::D2,
            }
        } else {
            wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float {
                    filterable: false,
                },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            }
        };

        let layout = wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty,
            count: None,
        };

        let resource = wgpu::BindingResource::TextureView(self.view);

        vec![(layout, resource)]
    }
}
