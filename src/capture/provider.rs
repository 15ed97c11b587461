//! Image acquisition boundary. Implementations wrap a camera or gallery picker;
//! the core only ever sees an opaque [`ImageHandle`] or an [`AcquisitionFailure`].

use async_trait::async_trait;
use std::{
    collections::VecDeque,
    sync::{Mutex, PoisonError},
};
use thiserror::Error;

use crate::models::{ImageHandle, ImageSource};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AcquisitionFailure {
    #[error("acquisition cancelled by the user")]
    Cancelled,
    #[error("permission to use the {0} was denied")]
    Denied(&'static str),
    #[error("no {0} is available")]
    Unavailable(&'static str),
    #[error("device error: {0}")]
    Device(String),
}

#[async_trait]
pub trait CapabilityProvider: Send + Sync {
    async fn capture(&self) -> Result<ImageHandle, AcquisitionFailure>;

    async fn pick_from_gallery(&self) -> Result<ImageHandle, AcquisitionFailure>;

    async fn acquire(&self, source: ImageSource) -> Result<ImageHandle, AcquisitionFailure> {
        match source {
            ImageSource::Camera => self.capture().await,
            ImageSource::Gallery => self.pick_from_gallery().await,
        }
    }
}

/// Provider for hosts without a camera or picker; every request fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableProvider;

#[async_trait]
impl CapabilityProvider for UnavailableProvider {
    async fn capture(&self) -> Result<ImageHandle, AcquisitionFailure> {
        Err(AcquisitionFailure::Unavailable("camera"))
    }

    async fn pick_from_gallery(&self) -> Result<ImageHandle, AcquisitionFailure> {
        Err(AcquisitionFailure::Unavailable("gallery"))
    }
}

/// Hands out pre-supplied image URIs in order, regardless of source.
/// `None` entries and an exhausted queue behave like a failed acquisition.
#[derive(Debug, Default)]
pub struct QueuedProvider {
    queue: Mutex<VecDeque<Option<ImageHandle>>>,
}

impl QueuedProvider {
    pub fn new<I>(handles: I) -> Self
    where
        I: IntoIterator<Item = Option<ImageHandle>>,
    {
        Self {
            queue: Mutex::new(handles.into_iter().collect()),
        }
    }

    pub fn remaining(&self) -> usize {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn next(&self, source: &'static str) -> Result<ImageHandle, AcquisitionFailure> {
        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        match queue.pop_front() {
            Some(Some(handle)) => Ok(handle),
            Some(None) => Err(AcquisitionFailure::Cancelled),
            None => Err(AcquisitionFailure::Unavailable(source)),
        }
    }
}

#[async_trait]
impl CapabilityProvider for QueuedProvider {
    async fn capture(&self) -> Result<ImageHandle, AcquisitionFailure> {
        self.next("camera")
    }

    async fn pick_from_gallery(&self) -> Result<ImageHandle, AcquisitionFailure> {
        self.next("gallery")
    }
}
