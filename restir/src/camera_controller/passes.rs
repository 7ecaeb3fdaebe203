use log::debug;

use crate::{Camera, CameraBuffers, Engine, GBuffer};

macro_rules! passes {
    ([ $( $name:ident => $class:ident, )* ]) => {
        $( mod $name; )*
        $( pub use self::$name::*; )*

        #[derive(Debug)]
        pub struct CameraPasses {
            $( pub $name: $class, )*
        }

        impl CameraPasses {
            /// Creates all passes, in the order they depend on each other.
            pub fn new(
                engine: &Engine,
                device: &wgpu::Device,
                config: &Camera,
                buffers: &CameraBuffers,
                gbuffer: &GBuffer,
                tlas: &wgpu::Tlas,
            ) -> Self {
                debug!("Initializing camera passes");

                Self {
                    $(
                        $name: $class::new(
                            engine, device, config, buffers, gbuffer, tlas,
                        ),
                    )*
                }
            }
        }
    };
}

passes!([
    di_sampling => DiSamplingPass,
    frame_reprojection => FrameReprojectionPass,
    di_temporal_resampling => DiTemporalResamplingPass,
    di_spatial_resampling => DiSpatialResamplingPass,
    di_shading => DiShadingPass,
    history_accumulation => HistoryAccumulationPass,
]);
