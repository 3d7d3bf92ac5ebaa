use fxhash::FxHashMap;

use crate::{CameraController, Error};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CameraHandle(usize);

impl CameraHandle {
    pub(crate) fn new(id: usize) -> Self {
        Self(id)
    }
}

#[derive(Debug, Default)]
pub struct CameraControllers {
    cameras: FxHashMap<CameraHandle, CameraController>,
    next_id: usize,
}

impl CameraControllers {
    pub fn add(&mut self, camera: CameraController) -> CameraHandle {
        let handle = CameraHandle::new(self.next_id);

        self.cameras.insert(handle, camera);
        self.next_id += 1;

        handle
    }

    pub fn get(
        &self,
        camera_handle: CameraHandle,
    ) -> Result<&CameraController, Error> {
        self.cameras
            .get(&camera_handle)
            .ok_or(Error::UnknownCamera(camera_handle))
    }

    pub fn get_mut(
        &mut self,
        camera_handle: CameraHandle,
    ) -> Result<&mut CameraController, Error> {
        self.cameras
            .get_mut(&camera_handle)
            .ok_or(Error::UnknownCamera(camera_handle))
    }

    pub fn remove(&mut self, camera_handle: CameraHandle) -> Result<(), Error> {
        self.cameras
            .remove(&camera_handle)
            .map(drop)
            .ok_or(Error::UnknownCamera(camera_handle))
    }

    pub fn len(&self) -> usize {
        self.cameras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty()
    }
}
