//! GPU-based burn solver implementation
//!
//! This module provides a GPU implementation of the `BurnSolver` trait using
//! wgpu compute shaders and storage buffers. This backend is only available
//! when the `gpu` feature is enabled.
//!
//! # Shader Files
//!
//! GPU compute shaders are located in `shaders/`:
//! - `burn.wgsl` - One combustion step from the front to the back buffer
//! - `flame.wgsl` - Cell-to-color mapping into packed RGBA8 pixels
//!
//! # Implementation
//!
//! Cells live in two `array<vec4<f32>>` storage buffers used ping-pong. Bind
//! groups for both directions are built once, so a step is a uniform upload,
//! one dispatch and an index flip. Staging buffers handle CPU readback.

use super::context::GpuContext;
use super::fields::{validate_cells, CellField};
use super::BurnSolver;
use crate::config::BurnParams;
use crate::core_types::{Cell, FrameImage, Spark};
use crate::error::SimError;
use bytemuck::{Pod, Zeroable};
use std::borrow::Cow;
use tracing::error;
use wgpu::util::DeviceExt;

/// Workgroup edge length (must match `@workgroup_size` in the shaders)
const WORKGROUP_SIZE: u32 = 16;

/// Kernel and palette parameters (must match WGSL struct layout)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct GpuBurnParams {
    width: u32,
    height: u32,
    spark: [f32; 2],
    burn_temp: f32,
    max_temp: f32,
    growth_rate: f32,
    fuel_decay: f32,
    extinguish_fuel: f32,
    conduction: f32,
    spark_gain: f32,
    spark_falloff: f32,
    spark_fuel_exponent: f32,
    brown_temp: f32,
    red_temp: f32,
    radius: i32,
}

impl GpuBurnParams {
    fn new(width: u32, height: u32, spark: [f32; 2], params: &BurnParams) -> Self {
        Self {
            width,
            height,
            spark,
            burn_temp: params.burn_temp,
            max_temp: params.max_temp,
            growth_rate: params.growth_rate,
            fuel_decay: params.fuel_decay,
            extinguish_fuel: params.extinguish_fuel,
            conduction: params.conduction,
            spark_gain: params.spark_gain,
            spark_falloff: params.spark_falloff,
            spark_fuel_exponent: params.spark_fuel_exponent,
            brown_temp: params.brown_temp(),
            red_temp: params.red_temp(),
            radius: i32::try_from(params.neighborhood_radius).unwrap_or(i32::MAX),
        }
    }
}

/// GPU-based burn solver using wgpu compute shaders
pub struct GpuBurnSolver {
    device: wgpu::Device,
    queue: wgpu::Queue,

    width: u32,
    height: u32,
    params: BurnParams,

    // Ping-pong cell buffers, `front` indexes the readable one
    cells: [wgpu::Buffer; 2],
    front: usize,
    pixels: wgpu::Buffer,

    cell_staging: wgpu::Buffer,
    pixel_staging: wgpu::Buffer,
    params_buffer: wgpu::Buffer,

    burn_pipeline: wgpu::ComputePipeline,
    flame_pipeline: wgpu::ComputePipeline,

    // Index i reads cells[i]
    burn_bind_groups: [wgpu::BindGroup; 2],
    flame_bind_groups: [wgpu::BindGroup; 2],
}

fn storage_entry(binding: u32, read_only: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn bind_group(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::BindGroupLayout,
    buffers: [&wgpu::Buffer; 3],
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: buffers[0].as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: buffers[1].as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: buffers[2].as_entire_binding(),
            },
        ],
    })
}

impl GpuBurnSolver {
    /// Create a new GPU burn solver
    ///
    /// Uploads `initial` into both cell buffers, loads shaders, and creates
    /// compute pipelines.
    ///
    /// # Arguments
    ///
    /// * `context` - GPU context with device and queue
    /// * `initial` - Starting sheet
    /// * `params` - Kernel constants; assumed already validated
    #[must_use]
    pub fn new(context: GpuContext, initial: &CellField, params: BurnParams) -> Self {
        let (device, queue, _adapter_info) = context.into_device_queue();
        let width = u32::try_from(initial.width).unwrap_or(u32::MAX);
        let height = u32::try_from(initial.height).unwrap_or(u32::MAX);

        let cell_bytes = std::mem::size_of_val(initial.as_slice()) as u64;
        let pixel_bytes = (initial.as_slice().len() * 4) as u64;

        let cells = ["Cells A", "Cells B"].map(|label| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(initial.as_slice()),
                usage: wgpu::BufferUsages::STORAGE
                    | wgpu::BufferUsages::COPY_SRC
                    | wgpu::BufferUsages::COPY_DST,
            })
        });

        let pixels = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Pixels"),
            size: pixel_bytes,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        let cell_staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Cell Staging"),
            size: cell_bytes,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let pixel_staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Pixel Staging"),
            size: pixel_bytes,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform = GpuBurnParams::new(width, height, crate::core_types::SPARK_SENTINEL, &params);
        let params_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Burn Params"),
            contents: bytemuck::bytes_of(&uniform),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let burn_shader = device.create_shader_module(wgpu::include_wgsl!("shaders/burn.wgsl"));
        let flame_shader = device.create_shader_module(wgpu::include_wgsl!("shaders/flame.wgsl"));

        let burn_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Burn Bind Group Layout"),
            entries: &[uniform_entry(0), storage_entry(1, true), storage_entry(2, false)],
        });
        let flame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Flame Bind Group Layout"),
            entries: &[uniform_entry(0), storage_entry(1, true), storage_entry(2, false)],
        });

        let burn_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Burn Pipeline Layout"),
            bind_group_layouts: &[&burn_layout],
            push_constant_ranges: &[],
        });
        let flame_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Flame Pipeline Layout"),
                bind_group_layouts: &[&flame_layout],
                push_constant_ranges: &[],
            });

        let burn_pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Burn Pipeline"),
            layout: Some(&burn_pipeline_layout),
            module: &burn_shader,
            entry_point: "main",
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            cache: None,
        });
        let flame_pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Flame Pipeline"),
            layout: Some(&flame_pipeline_layout),
            module: &flame_shader,
            entry_point: "main",
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            cache: None,
        });

        let burn_bind_groups = [
            bind_group(&device, "Burn A->B", &burn_layout, [&params_buffer, &cells[0], &cells[1]]),
            bind_group(&device, "Burn B->A", &burn_layout, [&params_buffer, &cells[1], &cells[0]]),
        ];
        let flame_bind_groups = [
            bind_group(&device, "Flame A", &flame_layout, [&params_buffer, &cells[0], &pixels]),
            bind_group(&device, "Flame B", &flame_layout, [&params_buffer, &cells[1], &pixels]),
        ];

        Self {
            device,
            queue,
            width,
            height,
            params,
            cells,
            front: 0,
            pixels,
            cell_staging,
            pixel_staging,
            params_buffer,
            burn_pipeline,
            flame_pipeline,
            burn_bind_groups,
            flame_bind_groups,
        }
    }

    /// Calculate workgroup count for dispatch
    fn workgroup_count(&self) -> (u32, u32) {
        (
            self.width.div_ceil(WORKGROUP_SIZE),
            self.height.div_ceil(WORKGROUP_SIZE),
        )
    }

    fn write_params(&self, spark: [f32; 2]) {
        let uniform = GpuBurnParams::new(self.width, self.height, spark, &self.params);
        self.queue
            .write_buffer(&self.params_buffer, 0, bytemuck::bytes_of(&uniform));
    }

    fn dispatch(&self, label: &str, pipeline: &wgpu::ComputePipeline, group: &wgpu::BindGroup) {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some(label) });
        {
            let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some(label),
                timestamp_writes: None,
            });
            compute_pass.set_pipeline(pipeline);
            compute_pass.set_bind_group(0, group, &[]);
            let (wg_x, wg_y) = self.workgroup_count();
            compute_pass.dispatch_workgroups(wg_x, wg_y, 1);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
    }

    /// Copy `src` into `staging` and map it.
    fn read_back<T: Pod>(
        &self,
        src: &wgpu::Buffer,
        staging: &wgpu::Buffer,
    ) -> Result<Vec<T>, SimError> {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Readback Encoder"),
            });
        encoder.copy_buffer_to_buffer(src, 0, staging, 0, staging.size());
        self.queue.submit(std::iter::once(encoder.finish()));

        let buffer_slice = staging.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        let _ = self.device.poll(wgpu::Maintain::Wait);

        let reason = match rx.recv() {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(format!("failed to map staging buffer: {e}")),
            Err(e) => Some(format!("staging buffer map callback dropped: {e}")),
        };
        if let Some(reason) = reason {
            error!("GPU readback failed: {}", reason);
            return Err(SimError::ReadbackFailed(reason));
        }

        let data = buffer_slice.get_mapped_range();
        let result: Vec<T> = bytemuck::cast_slice(&data).to_vec();
        drop(data);
        staging.unmap();
        Ok(result)
    }

    fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl BurnSolver for GpuBurnSolver {
    fn step(&mut self, spark: Spark) {
        self.write_params(spark.cell_position_or_sentinel(self.width as usize, self.height as usize));
        self.dispatch(
            "Burn Pass",
            &self.burn_pipeline,
            &self.burn_bind_groups[self.front],
        );
        self.front = 1 - self.front;
    }

    fn render(&mut self, image: &mut FrameImage) -> Result<(), SimError> {
        self.dispatch(
            "Flame Pass",
            &self.flame_pipeline,
            &self.flame_bind_groups[self.front],
        );
        let pixels = self.read_back::<[u8; 4]>(&self.pixels, &self.pixel_staging)?;

        let (width, height) = self.dimensions();
        if image.width() != width || image.height() != height {
            image.resize(width, height);
        }
        image.pixels_mut().copy_from_slice(&pixels);
        Ok(())
    }

    fn read_cells(&self) -> Result<Cow<'_, [Cell]>, SimError> {
        self.read_back::<Cell>(&self.cells[self.front], &self.cell_staging)
            .map(Cow::Owned)
    }

    fn write_cells(&mut self, cells: &[Cell]) -> Result<(), SimError> {
        if cells.len() != self.cell_count() {
            return Err(SimError::BufferSizeMismatch {
                expected: self.cell_count(),
                actual: cells.len(),
            });
        }
        validate_cells(cells)?;
        for buffer in &self.cells {
            self.queue
                .write_buffer(buffer, 0, bytemuck::cast_slice(cells));
        }
        Ok(())
    }

    fn dimensions(&self) -> (usize, usize) {
        (self.width as usize, self.height as usize)
    }

    fn is_gpu_accelerated(&self) -> bool {
        true
    }
}
