//! Device discovery for the GPU backend
//!
//! A missing adapter is normal on CI and headless servers; an adapter that
//! refuses to open a device usually means a driver problem. The two cases are
//! reported separately so the backend selector can log them differently.

/// Outcome of [`GpuContext::new`]
#[derive(Debug)]
pub enum GpuInitResult {
    #[cfg(feature = "gpu")]
    Success(GpuContext),
    /// No adapter at all
    NoGpuFound,
    /// An adapter exists but the device request failed
    InitFailed { adapter_name: String, error: String },
}

#[cfg(feature = "gpu")]
mod gpu_impl {
    use super::GpuInitResult;
    use crate::core_types::Cell;
    use tracing::{debug, info};

    /// Bytes per packed RGBA8 pixel in the flame output buffer
    const PIXEL_BYTES: u64 = 4;

    /// Device, queue and the adapter they came from
    #[derive(Debug)]
    pub struct GpuContext {
        device: wgpu::Device,
        queue: wgpu::Queue,
        adapter_info: wgpu::AdapterInfo,
    }

    fn find_adapter() -> Option<wgpu::Adapter> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
    }

    impl GpuContext {
        /// Pick a high-performance adapter and open a device on it
        ///
        /// Compute only; no surface is attached. Never panics: every failure
        /// is reported through [`GpuInitResult`] so callers can fall back.
        #[allow(clippy::new_ret_no_self)]
        pub fn new() -> GpuInitResult {
            let Some(adapter) = find_adapter() else {
                debug!("No GPU adapter found");
                return GpuInitResult::NoGpuFound;
            };

            let adapter_info = adapter.get_info();
            debug!(
                "Found GPU adapter: {} ({:?})",
                adapter_info.name, adapter_info.backend
            );

            let descriptor = wgpu::DeviceDescriptor {
                label: Some("PaperBurn GPU"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::Performance,
            };
            match pollster::block_on(adapter.request_device(&descriptor, None)) {
                Ok((device, queue)) => {
                    info!("GPU device ready on {}", adapter_info.name);
                    GpuInitResult::Success(Self {
                        device,
                        queue,
                        adapter_info,
                    })
                }
                Err(e) => {
                    debug!("Device request on {} failed: {}", adapter_info.name, e);
                    GpuInitResult::InitFailed {
                        adapter_name: adapter_info.name,
                        error: e.to_string(),
                    }
                }
            }
        }

        #[must_use]
        pub fn adapter_name(&self) -> &str {
            &self.adapter_info.name
        }

        /// Whether a `width` x `height` sheet fits on this device
        ///
        /// A cell buffer must fit one storage binding, the 16x16 dispatch
        /// must stay inside the workgroup limit, and all five buffers (two
        /// cell grids, cell staging, pixels, pixel staging) together must use
        /// less than half of `max_buffer_size`.
        #[must_use]
        pub fn can_allocate(&self, width: usize, height: usize) -> bool {
            let limits = self.device.limits();
            let cells = (width as u64) * (height as u64);
            let cell_bytes = cells * std::mem::size_of::<Cell>() as u64;

            let fits_binding = cell_bytes <= u64::from(limits.max_storage_buffer_binding_size);
            let max_edge = u64::from(limits.max_compute_workgroups_per_dimension) * 16;
            let fits_dispatch = width as u64 <= max_edge && height as u64 <= max_edge;
            let footprint = 3 * cell_bytes + 2 * cells * PIXEL_BYTES;

            fits_binding && fits_dispatch && footprint < limits.max_buffer_size / 2
        }

        #[must_use]
        pub fn device(&self) -> &wgpu::Device {
            &self.device
        }

        #[must_use]
        pub fn queue(&self) -> &wgpu::Queue {
            &self.queue
        }

        /// Give up the context, keeping its device and queue
        #[must_use]
        pub fn into_device_queue(self) -> (wgpu::Device, wgpu::Queue, wgpu::AdapterInfo) {
            (self.device, self.queue, self.adapter_info)
        }
    }

}

#[cfg(feature = "gpu")]
pub use gpu_impl::GpuContext;
