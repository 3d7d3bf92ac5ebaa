use std::any::{self, Any};
use std::cell::{Cell, Ref, RefCell, RefMut};
use std::rc::Rc;
use std::{fmt, mem};

use bytemuck::Pod;
use glam::{UVec2, Vec4};
use log::debug;

use super::{CommandEncoder, Device};
use crate::memory::Allocation;
use crate::Error;

/// Handle to the storage behind a buffer or a texture, as seen by kernels.
#[derive(Clone)]
pub struct Binding(Rc<dyn Any>);

/// Object that can be attached to a kernel, e.g. a buffer or a texture
pub trait Bindable {
    fn bind(&self) -> Binding;
}

/// Everything a single dispatch got bound to, in the order of bindings.
pub struct Bindings {
    items: Vec<Binding>,
    params: Vec<u8>,
}

impl Bindings {
    pub(crate) fn new(items: &[&dyn Bindable], params: &[u8]) -> Self {
        Self {
            items: items.iter().map(|item| item.bind()).collect(),
            params: params.to_vec(),
        }
    }

    pub fn buffer<T>(&self, binding: usize) -> Ref<'_, Vec<T>>
    where
        T: 'static,
    {
        self.get::<RefCell<Vec<T>>>(binding).borrow()
    }

    pub fn buffer_mut<T>(&self, binding: usize) -> RefMut<'_, Vec<T>>
    where
        T: 'static,
    {
        self.get::<RefCell<Vec<T>>>(binding).borrow_mut()
    }

    pub fn texture<T>(&self, binding: usize) -> &[Cell<T>]
    where
        T: 'static,
    {
        self.get::<Box<[Cell<T>]>>(binding)
    }

    pub fn uniform<T>(&self, binding: usize) -> T
    where
        T: Copy + 'static,
    {
        self.get::<Cell<T>>(binding).get()
    }

    /// Returns push constants the dispatch got recorded with.
    pub fn params<P>(&self) -> P
    where
        P: Pod,
    {
        bytemuck::pod_read_unaligned(&self.params)
    }

    fn get<T>(&self, binding: usize) -> &T
    where
        T: 'static,
    {
        self.items[binding]
            .0
            .downcast_ref()
            .unwrap_or_else(|| {
                panic!("binding #{binding} is not {}", any::type_name::<T>())
            })
    }
}

pub struct StorageBuffer<T> {
    label: String,
    data: Rc<RefCell<Vec<T>>>,
    _allocation: Allocation,
}

impl<T> StorageBuffer<T>
where
    T: Pod,
{
    pub fn new(
        device: &Device,
        label: impl AsRef<str>,
        len: usize,
    ) -> Result<Self, Error> {
        let label = label.as_ref();

        debug!(
            "Allocating storage buffer `{label}`; ty={}, len={len}",
            any::type_name::<T>(),
        );

        let allocation = device.allocate(label, len * mem::size_of::<T>())?;

        Ok(Self {
            label: label.to_owned(),
            data: Rc::new(RefCell::new(vec![T::zeroed(); len])),
            _allocation: allocation,
        })
    }

    pub fn len(&self) -> usize {
        self.data.borrow().len()
    }

    pub fn write(&self, _: &Device, items: &[T]) {
        self.data.borrow_mut()[..items.len()].copy_from_slice(items);
    }

    pub fn clear(&self, encoder: &mut CommandEncoder) {
        let data = Rc::clone(&self.data);

        encoder.push(format!("{}_clear", self.label), move || {
            data.borrow_mut().fill(T::zeroed());
        });
    }

    pub fn download(&self, _: &Device) -> Result<Vec<T>, Error> {
        Ok(self.data.borrow().clone())
    }

    pub(crate) fn raw(&self) -> &Rc<RefCell<Vec<T>>> {
        &self.data
    }
}

impl<T> Bindable for StorageBuffer<T>
where
    T: Pod,
{
    fn bind(&self) -> Binding {
        Binding(Rc::clone(&self.data) as Rc<dyn Any>)
    }
}

impl<T> fmt::Debug for StorageBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageBuffer")
            .field("label", &self.label)
            .finish()
    }
}

pub struct UniformBuffer<T> {
    label: String,
    data: Rc<Cell<T>>,
    _allocation: Allocation,
}

impl<T> UniformBuffer<T>
where
    T: Pod,
{
    pub fn new(device: &Device, label: impl AsRef<str>) -> Result<Self, Error> {
        let label = label.as_ref();
        let size = (mem::size_of::<T>() + 31) & !31;

        debug!(
            "Allocating uniform buffer `{label}`; ty={}, size={size}",
            any::type_name::<T>(),
        );

        let allocation = device.allocate(label, size)?;

        Ok(Self {
            label: label.to_owned(),
            data: Rc::new(Cell::new(T::zeroed())),
            _allocation: allocation,
        })
    }

    pub fn write(&self, _: &Device, data: &T) {
        self.data.set(*data);
    }
}

impl<T> Bindable for UniformBuffer<T>
where
    T: Pod,
{
    fn bind(&self) -> Binding {
        Binding(Rc::clone(&self.data) as Rc<dyn Any>)
    }
}

impl<T> fmt::Debug for UniformBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UniformBuffer")
            .field("label", &self.label)
            .finish()
    }
}

/// Two-dimensional storage texture, kept as a row-major array of texels.
pub struct Texture<T> {
    label: String,
    size: UVec2,
    texels: Rc<Box<[Cell<T>]>>,
    _allocation: Allocation,
}

pub type RgbaTexture = Texture<Vec4>;
pub type RTexture = Texture<f32>;

impl<T> Texture<T>
where
    T: Pod,
{
    pub fn new(
        device: &Device,
        label: impl AsRef<str>,
        size: UVec2,
    ) -> Result<Self, Error> {
        let label = label.as_ref();

        debug!("Allocating texture `{label}`; size={:?}", size);

        if size.x == 0 || size.y == 0 {
            return Err(Error::InvalidViewport { size });
        }

        let len = (size.x as usize) * (size.y as usize);
        let allocation = device.allocate(label, len * mem::size_of::<T>())?;

        Ok(Self {
            label: label.to_owned(),
            size,
            texels: Rc::new((0..len).map(|_| Cell::new(T::zeroed())).collect()),
            _allocation: allocation,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn upload(&self, _: &Device, texels: &[T]) {
        for (cell, &texel) in self.texels.iter().zip(texels) {
            cell.set(texel);
        }
    }

    pub fn download(&self, _: &Device) -> Result<Vec<T>, Error> {
        Ok(self.texels.iter().map(Cell::get).collect())
    }

    pub fn read(&self, pos: UVec2) -> T {
        self.texels[self.idx(pos)].get()
    }

    pub fn write(&self, pos: UVec2, value: T) {
        self.texels[self.idx(pos)].set(value);
    }

    pub fn fill(&self, value: T) {
        for texel in self.texels.iter() {
            texel.set(value);
        }
    }

    fn idx(&self, pos: UVec2) -> usize {
        (pos.y * self.size.x + pos.x) as usize
    }
}

impl<T> Bindable for Texture<T>
where
    T: Pod,
{
    fn bind(&self) -> Binding {
        Binding(Rc::clone(&self.texels) as Rc<dyn Any>)
    }
}

impl<T> fmt::Debug for Texture<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture")
            .field("label", &self.label)
            .field("size", &self.size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use glam::{uvec2, vec4};

    use super::*;

    #[test]
    fn texture() {
        let device = Device::default();
        let texture = RgbaTexture::new(&device, "test", uvec2(3, 2)).unwrap();

        texture.write(uvec2(2, 1), vec4(1.0, 2.0, 3.0, 4.0));

        assert_eq!(vec4(1.0, 2.0, 3.0, 4.0), texture.read(uvec2(2, 1)));
        assert_eq!(Vec4::ZERO, texture.read(uvec2(1, 1)));

        let texels = texture.download(&device).unwrap();

        assert_eq!(6, texels.len());
        assert_eq!(vec4(1.0, 2.0, 3.0, 4.0), texels[5]);
        assert_eq!(3 * 2 * 16, device.allocated());
    }

    #[test]
    fn empty_texture() {
        let device = Device::default();

        assert!(matches!(
            RTexture::new(&device, "test", uvec2(0, 4)),
            Err(Error::InvalidViewport { .. })
        ));
    }

    #[test]
    fn out_of_memory() {
        let device = Device::default().with_memory_budget(Some(64));
        let buffer = StorageBuffer::<u32>::new(&device, "a", 12).unwrap();

        assert!(matches!(
            StorageBuffer::<u32>::new(&device, "b", 8),
            Err(Error::OutOfMemory { available: 16, .. })
        ));

        drop(buffer);

        assert_eq!(0, device.allocated());
        assert!(StorageBuffer::<u32>::new(&device, "b", 8).is_ok());
    }

    #[test]
    fn clear_is_deferred() {
        let device = Device::default();
        let buffer = StorageBuffer::<u32>::new(&device, "test", 4).unwrap();
        let mut encoder = device.create_command_encoder("test");

        buffer.write(&device, &[1, 2, 3]);
        buffer.clear(&mut encoder);

        assert_eq!(vec![1, 2, 3, 0], buffer.download(&device).unwrap());

        device.submit(encoder);

        assert_eq!(vec![0; 4], buffer.download(&device).unwrap());
    }
}
