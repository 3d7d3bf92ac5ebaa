use futures::channel::oneshot;

use crate::device::Device;
use crate::Error;

/// Maps given staging buffer (which must be `MAP_READ`) and returns its
/// contents; blocks until all previously submitted work is done.
pub(crate) fn read_buffer(
    device: &Device,
    label: &str,
    buffer: &wgpu::Buffer,
) -> Result<Vec<u8>, Error> {
    let slice = buffer.slice(..);
    let (sender, receiver) = oneshot::channel();

    slice.map_async(wgpu::MapMode::Read, move |result| {
        _ = sender.send(result);
    });

    device.raw().poll(wgpu::Maintain::Wait);

    pollster::block_on(receiver)
        .map_err(|_| Error::Readback {
            label: label.to_owned(),
            reason: "mapping got cancelled".into(),
        })?
        .map_err(|err| Error::Readback {
            label: label.to_owned(),
            reason: err.to_string(),
        })?;

    let data = slice.get_mapped_range().to_vec();

    buffer.unmap();

    Ok(data)
}

/// Creates a buffer the GPU can copy into and the CPU can read from.
pub(crate) fn staging_buffer(
    device: &Device,
    label: &str,
    size: u64,
) -> wgpu::Buffer {
    device.raw().create_buffer(&wgpu::BufferDescriptor {
        label: Some(&format!("{label}_staging")),
        size,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    })
}

/// Aligns number of bytes per row to what texture-to-buffer copies require.
pub(crate) fn padded_bytes_per_row(bytes_per_row: u32) -> u32 {
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;

    (bytes_per_row + align - 1) / align * align
}
