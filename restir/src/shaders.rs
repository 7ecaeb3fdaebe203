use log::debug;

macro_rules! shader_source {
    (raytraced $name:literal) => {
        concat!(
            "enable wgpu_ray_query;\n",
            include_str!("shaders/common.wgsl"),
            include_str!("shaders/gbuffer.wgsl"),
            include_str!("shaders/lights.wgsl"),
            include_str!("shaders/visibility.wgsl"),
            include_str!(concat!("shaders/", $name, ".wgsl")),
        )
    };

    (rasterized $name:literal) => {
        concat!(
            include_str!("shaders/common.wgsl"),
            include_str!("shaders/gbuffer.wgsl"),
            include_str!(concat!("shaders/", $name, ".wgsl")),
        )
    };

    (plain $name:literal) => {
        concat!(
            include_str!("shaders/common.wgsl"),
            include_str!(concat!("shaders/", $name, ".wgsl")),
        )
    };
}

/// Shader module paired with the entry point a pass runs.
pub type ShaderEntry = (wgpu::ShaderModule, &'static str);

#[derive(Debug)]
pub struct Shaders {
    pub di_sampling: ShaderEntry,
    pub frame_reprojection: ShaderEntry,
    pub di_temporal_resampling_biased: ShaderEntry,
    pub di_temporal_resampling_unbiased: ShaderEntry,
    pub di_spatial_resampling_biased: ShaderEntry,
    pub di_spatial_resampling_unbiased: ShaderEntry,
    pub di_shading: ShaderEntry,
    pub history_accumulation: ShaderEntry,
    pub history_clear: ShaderEntry,
}

impl Shaders {
    pub fn new(device: &wgpu::Device) -> Self {
        debug!("Compiling shaders");

        let module = |label: &str, source: &'static str| {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&format!("restir_{label}")),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            })
        };

        let di_sampling =
            module("di_sampling", shader_source!(raytraced "di_sampling"));

        let frame_reprojection = module(
            "frame_reprojection",
            shader_source!(rasterized "frame_reprojection"),
        );

        let di_temporal_resampling = module(
            "di_temporal_resampling",
            shader_source!(raytraced "di_temporal_resampling"),
        );

        let di_spatial_resampling = module(
            "di_spatial_resampling",
            shader_source!(raytraced "di_spatial_resampling"),
        );

        let di_shading =
            module("di_shading", shader_source!(raytraced "di_shading"));

        let history_accumulation = module(
            "history_accumulation",
            shader_source!(plain "history_accumulation"),
        );

        Self {
            di_sampling: (di_sampling, "main"),
            frame_reprojection: (frame_reprojection, "main"),
            di_temporal_resampling_biased: (
                di_temporal_resampling.clone(),
                "main_biased",
            ),
            di_temporal_resampling_unbiased: (
                di_temporal_resampling,
                "main_unbiased",
            ),
            di_spatial_resampling_biased: (
                di_spatial_resampling.clone(),
                "main_biased",
            ),
            di_spatial_resampling_unbiased: (
                di_spatial_resampling,
                "main_unbiased",
            ),
            di_shading: (di_shading, "main"),
            history_accumulation: (history_accumulation.clone(), "main"),
            history_clear: (history_accumulation, "clear"),
        }
    }
}
