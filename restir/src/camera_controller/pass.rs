use log::debug;

use crate::{
    BindGroup, BindGroupBuilder, CameraController, FrameBindable, ShaderEntry,
};

#[derive(Debug)]
pub struct CameraComputePass {
    label: String,
    bind_groups: Vec<BindGroup>,
    pipeline: wgpu::ComputePipeline,
}

impl CameraComputePass {
    pub fn builder<'a>(
        label: impl ToString,
        slots: usize,
    ) -> CameraPassBuilder<'a> {
        CameraPassBuilder {
            label: label.to_string(),
            slots,
            bind_groups: Default::default(),
        }
    }

    pub fn run(
        &self,
        camera: &CameraController,
        encoder: &mut wgpu::CommandEncoder,
        slot: usize,
    ) {
        let label = format!("restir_{}_pass", self.label);
        let size = camera.workgroups();

        let mut pass =
            encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some(&label),
                timestamp_writes: None,
            });

        pass.set_pipeline(&self.pipeline);

        for (bind_group_idx, bind_group) in self.bind_groups.iter().enumerate()
        {
            pass.set_bind_group(
                bind_group_idx as u32,
                bind_group.get(slot),
                &[],
            );
        }

        pass.dispatch_workgroups(size.x, size.y, 1);
    }
}

pub struct CameraPassBuilder<'a> {
    label: String,
    slots: usize,
    bind_groups: Vec<BindGroupBuilder<'a>>,
}

impl<'a> CameraPassBuilder<'a> {
    pub fn bind<const N: usize>(
        mut self,
        items: [&'a dyn FrameBindable; N],
    ) -> Self {
        let mut bind_group = BindGroup::builder(
            format!("{}_bg{}", self.label, self.bind_groups.len()),
            self.slots,
        );

        for item in items {
            bind_group = bind_group.add(item);
        }

        self.bind_groups.push(bind_group);
        self
    }

    pub fn build(
        self,
        device: &wgpu::Device,
        (module, entry_point): &ShaderEntry,
    ) -> CameraComputePass {
        debug!("Initializing pass: {}:{}", self.label, entry_point);

        let bind_groups: Vec<_> = self
            .bind_groups
            .into_iter()
            .map(|bg| bg.build(device))
            .collect();

        let bind_group_layouts: Vec<_> =
            bind_groups.iter().map(|bg| Some(bg.layout())).collect();

        let pipeline_layout_label =
            format!("restir_{}_pipeline_layout", self.label);

        let pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(&pipeline_layout_label),
                bind_group_layouts: &bind_group_layouts,
                immediate_size: 0,
            });

        let pipeline_label = format!("restir_{}_pipeline", self.label);

        let pipeline =
            device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some(&pipeline_label),
                layout: Some(&pipeline_layout),
                module,
                entry_point: Some(*entry_point),
                compilation_options: Default::default(),
                cache: None,
            });

        CameraComputePass {
            label: self.label,
            bind_groups,
            pipeline,
        }
    }
}
