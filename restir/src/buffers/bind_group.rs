use crate::FrameBindable;

/// Bind group existing in one version per frame slot.
#[derive(Debug)]
pub struct BindGroup {
    bind_groups: Vec<wgpu::BindGroup>,
    bind_group_layout: wgpu::BindGroupLayout,
}

impl BindGroup {
    pub fn builder<'ctx>(
        label: impl ToString,
        slots: usize,
    ) -> BindGroupBuilder<'ctx> {
        BindGroupBuilder {
            label: label.to_string(),
            slots,
            layouts: Default::default(),
            resources: Default::default(),
        }
    }

    pub fn get(&self, slot: usize) -> &wgpu::BindGroup {
        &self.bind_groups[slot]
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }
}

pub struct BindGroupBuilder<'a> {
    label: String,
    slots: usize,
    layouts: Vec<wgpu::BindGroupLayoutEntry>,
    resources: Vec<Vec<wgpu::BindingResource<'a>>>,
}

impl<'a> BindGroupBuilder<'a> {
    pub fn add(mut self, item: &'a dyn FrameBindable) -> Self {
        for (layout, resources) in
            item.bind(self.resources.len() as u32, self.slots)
        {
            self.layouts.push(layout);
            self.resources.push(resources);
        }

        self
    }

    pub fn build(self, device: &wgpu::Device) -> BindGroup {
        let label = format!("restir_{}", self.label);

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(&format!("{label}_layout")),
                entries: &self.layouts,
            });

        let bind_groups = (0..self.slots)
            .map(|slot| {
                let entries: Vec<_> = self
                    .resources
                    .iter()
                    .enumerate()
                    .map(|(binding, resources)| wgpu::BindGroupEntry {
                        binding: binding as _,
                        resource: resources[slot].clone(),
                    })
                    .collect();

                device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&format!("{label}_{slot}")),
                    layout: &bind_group_layout,
                    entries: &entries,
                })
            })
            .collect();

        BindGroup {
            bind_groups,
            bind_group_layout,
        }
    }
}
